//! DLP policy documents.

use serde::Deserialize;
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, IdName, QueryResponse};
use crate::model::DlpPolicy;

pub const CURSOR_DLP_POLICIES: &str = "dlpPoliciesEndCursor";

impl From<IdName> for DlpPolicy {
    fn from(node: IdName) -> Self {
        Self {
            id: node.id,
            name: node.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDlpPolicy {
    pub dlp_policy: Option<IdName>,
}

impl GraphqlOperation for ReadDlpPolicy {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readDLPPolicy";
    const DOCUMENT: &'static str =
        "($id: ID, $name: String) { dlpPolicy(id: $id, name: $name) { id name } }";
}

impl QueryResponse for ReadDlpPolicy {
    fn is_empty(&self) -> bool {
        self.dlp_policy.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDlpPolicies {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub dlp_policies: PaginatedResource<Edge<IdName>>,
}

impl GraphqlOperation for ReadDlpPolicies {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readDLPPolicies";
    const DOCUMENT: &'static str = concat!(
        "($filter: DLPPolicyFilterField, $dlpPoliciesEndCursor: String, $pageLimit: Int) ",
        "{ dlpPolicies(filter: $filter, after: $dlpPoliciesEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { id name } } } }"
    );
}

impl QueryResponse for ReadDlpPolicies {
    fn is_empty(&self) -> bool {
        self.dlp_policies.edges.is_empty()
    }
}
