//! Group documents.

use serde::Deserialize;
use serde_json::{Value, json};
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, EntityResponse, IdNode, OkError, QueryResponse, name_filter};
use crate::model::{GROUP_TYPE_MANUAL, GROUP_TYPE_SYNCED, GROUP_TYPE_SYSTEM, Group, GroupsFilter};

pub const CURSOR_GROUPS: &str = "groupsEndCursor";

macro_rules! group_fields {
    () => {
        "id name type isActive isAuthoritative securityPolicy { id }"
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub group_type: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_authoritative: bool,
    #[serde(default)]
    pub security_policy: Option<IdNode>,
}

impl From<GroupNode> for Group {
    fn from(node: GroupNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            group_type: node.group_type,
            is_active: node.is_active,
            is_authoritative: node.is_authoritative,
            security_policy_id: node
                .security_policy
                .map(|policy| policy.id)
                .filter(|id| !id.is_empty()),
        }
    }
}

/// Server-side filter: active groups of every type unless narrowed.
pub fn group_filter_input(filter: &GroupsFilter) -> Value {
    let types = filter.group_type.as_ref().map_or_else(
        || vec![GROUP_TYPE_MANUAL, GROUP_TYPE_SYNCED, GROUP_TYPE_SYSTEM],
        |kind| vec![kind.as_str()],
    );
    let mut input = json!({
        "type": {"in": types},
        "isActive": {"eq": filter.is_active.unwrap_or(true)},
    });
    if let Value::Object(name) = name_filter(filter.name.as_deref(), filter.name_filter) {
        if let Value::Object(input) = &mut input {
            input.extend(name);
        }
    }
    input
}

#[derive(Debug, Deserialize)]
pub struct ReadGroup {
    pub group: Option<GroupNode>,
}

impl GraphqlOperation for ReadGroup {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readGroup";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!) { group(id: $id) { ",
        group_fields!(),
        " } }"
    );
}

impl QueryResponse for ReadGroup {
    fn is_empty(&self) -> bool {
        self.group.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadGroups {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub groups: PaginatedResource<Edge<GroupNode>>,
}

impl GraphqlOperation for ReadGroups {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readGroups";
    const DOCUMENT: &'static str = concat!(
        "($filter: GroupFilterInput, $groupsEndCursor: String, $pageLimit: Int) ",
        "{ groups(filter: $filter, after: $groupsEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { ",
        group_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadGroups {
    fn is_empty(&self) -> bool {
        self.groups.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadGroupsByName {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub groups: PaginatedResource<Edge<GroupNode>>,
}

impl GraphqlOperation for ReadGroupsByName {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readGroups";
    const DOCUMENT: &'static str = concat!(
        "($name: String!, $groupsEndCursor: String, $pageLimit: Int) ",
        "{ groups(filter: {name: {eq: $name}}, after: $groupsEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { ",
        group_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadGroupsByName {
    fn is_empty(&self) -> bool {
        self.groups.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub group_create: EntityResponse<GroupNode>,
}

mutation_payload!(CreateGroup, group_create);

impl GraphqlOperation for CreateGroup {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "createGroup";
    const DOCUMENT: &'static str = concat!(
        "($name: String!, $securityPolicyId: ID) ",
        "{ groupCreate(name: $name, securityPolicyId: $securityPolicyId) { ok error entity { ",
        group_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroup {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub group_update: EntityResponse<GroupNode>,
}

mutation_payload!(UpdateGroup, group_update);

impl GraphqlOperation for UpdateGroup {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateGroup";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $name: String, $securityPolicyId: ID) ",
        "{ groupUpdate(id: $id, name: $name, securityPolicyId: $securityPolicyId) { ok error entity { ",
        group_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGroup {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub group_delete: OkError,
}

mutation_payload!(DeleteGroup, group_delete);

impl GraphqlOperation for DeleteGroup {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "deleteGroup";
    const DOCUMENT: &'static str = "($id: ID!) { groupDelete(id: $id) { ok error } }";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NameFilter;

    #[test]
    fn default_filter_selects_active_groups_of_every_type() {
        assert_eq!(
            group_filter_input(&GroupsFilter::default()),
            json!({
                "type": {"in": ["MANUAL", "SYNCED", "SYSTEM"]},
                "isActive": {"eq": true}
            })
        );
    }

    #[test]
    fn filter_narrows_type_activity_and_name() {
        let filter = GroupsFilter {
            name: Some("eng".into()),
            name_filter: NameFilter::Contains,
            group_type: Some(GROUP_TYPE_SYNCED.into()),
            is_active: Some(false),
        };
        assert_eq!(
            group_filter_input(&filter),
            json!({
                "type": {"in": ["SYNCED"]},
                "isActive": {"eq": false},
                "name": {"contains": "eng"}
            })
        );
    }

    #[test]
    fn empty_security_policy_is_none() {
        let node: GroupNode = serde_json::from_value(json!({
            "id": "G1",
            "name": "ops",
            "type": "MANUAL",
            "isActive": true,
            "securityPolicy": {"id": ""}
        }))
        .expect("decode");
        let group = Group::from(node);
        assert_eq!(group.group_type, GROUP_TYPE_MANUAL);
        assert!(group.security_policy_id.is_none());
    }
}
