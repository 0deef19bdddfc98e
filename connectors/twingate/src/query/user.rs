//! User documents.

use serde::Deserialize;
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, QueryResponse};
use crate::model::User;

pub const CURSOR_USERS: &str = "usersEndCursor";

macro_rules! user_fields {
    () => {
        "id firstName lastName email role"
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl From<UserNode> for User {
    fn from(node: UserNode) -> Self {
        Self {
            id: node.id,
            first_name: node.first_name,
            last_name: node.last_name,
            email: node.email,
            role: node.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadUser {
    pub user: Option<UserNode>,
}

impl GraphqlOperation for ReadUser {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readUser";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!) { user(id: $id) { ",
        user_fields!(),
        " } }"
    );
}

impl QueryResponse for ReadUser {
    fn is_empty(&self) -> bool {
        self.user.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadUsers {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub users: PaginatedResource<Edge<UserNode>>,
}

impl GraphqlOperation for ReadUsers {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readUsers";
    const DOCUMENT: &'static str = concat!(
        "($usersEndCursor: String, $pageLimit: Int) ",
        "{ users(after: $usersEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { ",
        user_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadUsers {
    fn is_empty(&self) -> bool {
        self.users.edges.is_empty()
    }
}
