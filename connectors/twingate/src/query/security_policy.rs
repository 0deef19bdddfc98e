//! Security policy documents.

use serde::Deserialize;
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, QueryResponse};
use crate::model::SecurityPolicy;

pub const CURSOR_POLICIES: &str = "policiesEndCursor";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPolicyNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy_type: String,
}

impl From<SecurityPolicyNode> for SecurityPolicy {
    fn from(node: SecurityPolicyNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            policy_type: node.policy_type,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSecurityPolicy {
    pub security_policy: Option<SecurityPolicyNode>,
}

impl GraphqlOperation for ReadSecurityPolicy {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readSecurityPolicy";
    const DOCUMENT: &'static str =
        "($id: ID, $name: String) { securityPolicy(id: $id, name: $name) { id name policyType } }";
}

impl QueryResponse for ReadSecurityPolicy {
    fn is_empty(&self) -> bool {
        self.security_policy.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSecurityPolicies {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub security_policies: PaginatedResource<Edge<SecurityPolicyNode>>,
}

impl GraphqlOperation for ReadSecurityPolicies {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readSecurityPolicies";
    const DOCUMENT: &'static str = concat!(
        "($filter: SecurityPolicyFilterField, $policiesEndCursor: String, $pageLimit: Int) ",
        "{ securityPolicies(filter: $filter, after: $policiesEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { id name policyType } } } }"
    );
}

impl QueryResponse for ReadSecurityPolicies {
    fn is_empty(&self) -> bool {
        self.security_policies.edges.is_empty()
    }
}
