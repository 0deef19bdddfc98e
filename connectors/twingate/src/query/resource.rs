//! Resource documents.

use serde::Deserialize;
use serde_json::{Value, json};
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, EntityResponse, IdNode, OkError, QueryResponse};
use crate::error::ConversionError;
use crate::model::{AccessGroup, Protocols, Resource};

pub const CURSOR_ACCESS: &str = "accessEndCursor";
pub const CURSOR_RESOURCES: &str = "resourcesEndCursor";

const ACCESS_GROUP: &str = "Group";
const ACCESS_SERVICE_ACCOUNT: &str = "ServiceAccount";

macro_rules! resource_fields {
    () => {
        concat!(
            "id name address { value } remoteNetwork { id } ",
            "protocols { allowIcmp tcp { policy ports { start end } } udp { policy ports { start end } } } ",
            "isActive isVisible isBrowserShortcutEnabled alias securityPolicy { id } tags { key value }"
        )
    };
}

macro_rules! access_connection {
    () => {
        concat!(
            "access(after: $accessEndCursor, first: $pageLimit) { ",
            page_info!(),
            " edges { node { __typename ... on Group { id } ... on ServiceAccount { id } } ",
            "securityPolicy { id } } }"
        )
    };
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressNode {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagNode {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: AddressNode,
    #[serde(default)]
    pub remote_network: IdNode,
    #[serde(default)]
    pub protocols: Option<Protocols>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub is_browser_shortcut_enabled: bool,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub security_policy: Option<IdNode>,
    #[serde(default)]
    pub tags: Vec<TagNode>,
}

impl From<ResourceNode> for Resource {
    fn from(node: ResourceNode) -> Self {
        Self {
            id: node.id,
            remote_network_id: node.remote_network.id,
            address: node.address.value,
            name: node.name,
            protocols: node.protocols.unwrap_or_default(),
            is_active: node.is_active,
            groups_access: Vec::new(),
            service_accounts: Vec::new(),
            is_visible: Some(node.is_visible),
            is_browser_shortcut_enabled: Some(node.is_browser_shortcut_enabled),
            alias: node.alias.filter(|alias| !alias.is_empty()),
            security_policy_id: non_empty_id(node.security_policy),
            tags: node
                .tags
                .into_iter()
                .map(|tag| (tag.key, tag.value))
                .collect(),
        }
    }
}

fn non_empty_id(node: Option<IdNode>) -> Option<String> {
    node.map(|node| node.id).filter(|id| !id.is_empty())
}

/// Principal granted access: a group or a service account.
#[derive(Debug, Clone, Deserialize)]
pub struct Principal {
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessEdge {
    pub node: Principal,
    #[serde(default)]
    pub security_policy: Option<IdNode>,
}

/// Append access edges to `resource`, in order.
pub fn apply_access(resource: &mut Resource, edges: Vec<AccessEdge>) -> Result<(), ConversionError> {
    for edge in edges {
        match edge.node.typename.as_str() {
            ACCESS_GROUP => {
                if edge.node.id.is_empty() {
                    return Err(ConversionError(
                        "access group ID is missing in response".into(),
                    ));
                }
                resource.groups_access.push(AccessGroup {
                    group_id: edge.node.id,
                    security_policy_id: non_empty_id(edge.security_policy),
                });
            }
            ACCESS_SERVICE_ACCOUNT => {
                if edge.node.id.is_empty() {
                    return Err(ConversionError(
                        "access service account ID is missing in response".into(),
                    ));
                }
                resource.service_accounts.push(edge.node.id);
            }
            _ => {}
        }
    }
    Ok(())
}

/// `[{key, value}]` tag input.
pub fn tags_input(resource: &Resource) -> Value {
    Value::Array(
        resource
            .tags
            .iter()
            .map(|(key, value)| json!({"key": key, "value": value}))
            .collect(),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceWithAccess {
    #[serde(flatten)]
    pub node: ResourceNode,
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub access: PaginatedResource<AccessEdge>,
}

#[derive(Debug, Deserialize)]
pub struct ReadResource {
    pub resource: Option<ResourceWithAccess>,
}

impl GraphqlOperation for ReadResource {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readResource";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $accessEndCursor: String, $pageLimit: Int) { resource(id: $id) { ",
        resource_fields!(),
        " ",
        access_connection!(),
        " } }"
    );
}

impl QueryResponse for ReadResource {
    fn is_empty(&self) -> bool {
        self.resource.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceAccessNode {
    pub id: String,
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub access: PaginatedResource<AccessEdge>,
}

/// Follow-up page of a resource's access list.
#[derive(Debug, Deserialize)]
pub struct ReadResourceAccess {
    pub resource: Option<ResourceAccessNode>,
}

impl GraphqlOperation for ReadResourceAccess {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readResourceAccessAfter";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $accessEndCursor: String, $pageLimit: Int) { resource(id: $id) { id ",
        access_connection!(),
        " } }"
    );
}

impl QueryResponse for ReadResourceAccess {
    fn is_empty(&self) -> bool {
        self.resource.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadResources {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resources: PaginatedResource<Edge<ResourceNode>>,
}

impl GraphqlOperation for ReadResources {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readResources";
    const DOCUMENT: &'static str = concat!(
        "($resourcesEndCursor: String, $pageLimit: Int) ",
        "{ resources(after: $resourcesEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { ",
        resource_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadResources {
    fn is_empty(&self) -> bool {
        self.resources.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resource_create: EntityResponse<ResourceNode>,
}

mutation_payload!(CreateResource, resource_create);

impl GraphqlOperation for CreateResource {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "createResource";
    const DOCUMENT: &'static str = concat!(
        "($remoteNetworkId: ID!, $name: String!, $address: String!, $protocols: ProtocolsInput, ",
        "$isVisible: Boolean, $isBrowserShortcutEnabled: Boolean, $alias: String, ",
        "$securityPolicyId: ID, $tags: [TagInput!]) ",
        "{ resourceCreate(remoteNetworkId: $remoteNetworkId, name: $name, address: $address, ",
        "protocols: $protocols, isVisible: $isVisible, isBrowserShortcutEnabled: $isBrowserShortcutEnabled, ",
        "alias: $alias, securityPolicyId: $securityPolicyId, tags: $tags) { ok error entity { ",
        resource_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResource {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resource_update: EntityResponse<ResourceNode>,
}

mutation_payload!(UpdateResource, resource_update);

impl GraphqlOperation for UpdateResource {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateResource";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $remoteNetworkId: ID, $name: String, $address: String, $protocols: ProtocolsInput, ",
        "$isVisible: Boolean, $isBrowserShortcutEnabled: Boolean, $alias: String, ",
        "$securityPolicyId: ID, $tags: [TagInput!]) ",
        "{ resourceUpdate(id: $id, remoteNetworkId: $remoteNetworkId, name: $name, address: $address, ",
        "protocols: $protocols, isVisible: $isVisible, isBrowserShortcutEnabled: $isBrowserShortcutEnabled, ",
        "alias: $alias, securityPolicyId: $securityPolicyId, tags: $tags) { ok error entity { ",
        resource_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResource {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resource_delete: OkError,
}

mutation_payload!(DeleteResource, resource_delete);

impl GraphqlOperation for DeleteResource {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "deleteResource";
    const DOCUMENT: &'static str = "($id: ID!) { resourceDelete(id: $id) { ok error } }";
}

#[derive(Debug, Deserialize)]
pub struct ReadResourcesByName {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resources: PaginatedResource<Edge<ResourceNode>>,
}

impl GraphqlOperation for ReadResourcesByName {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readResourcesByName";
    const DOCUMENT: &'static str = concat!(
        "($filter: ResourceFilterInput, $resourcesEndCursor: String, $pageLimit: Int) ",
        "{ resources(filter: $filter, after: $resourcesEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { ",
        resource_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadResourcesByName {
    fn is_empty(&self) -> bool {
        self.resources.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceActiveState {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resource_update: OkError,
}

mutation_payload!(UpdateResourceActiveState, resource_update);

impl GraphqlOperation for UpdateResourceActiveState {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateResourceActiveState";
    const DOCUMENT: &'static str =
        "($id: ID!, $isActive: Boolean) { resourceUpdate(id: $id, isActive: $isActive) { ok error } }";
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResourceAccess {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resource_access_add: OkError,
}

mutation_payload!(AddResourceAccess, resource_access_add);

impl GraphqlOperation for AddResourceAccess {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "addResourceAccess";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $access: [AccessInput!]) ",
        "{ resourceAccessAdd(resourceId: $id, access: $access) { ok error } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResourceAccess {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resource_access_remove: OkError,
}

mutation_payload!(RemoveResourceAccess, resource_access_remove);

impl GraphqlOperation for RemoveResourceAccess {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "removeResourceAccess";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $principalIds: [ID]) ",
        "{ resourceAccessRemove(resourceId: $id, principalIds: $principalIds) { ok error } }"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::POLICY_ALLOW_ALL;

    fn edge(typename: &str, id: &str) -> AccessEdge {
        serde_json::from_value(json!({
            "node": {"__typename": typename, "id": id},
            "securityPolicy": {"id": "P1"}
        }))
        .expect("edge")
    }

    #[test]
    fn access_edges_split_by_principal() {
        let mut resource = Resource::default();
        apply_access(
            &mut resource,
            vec![
                edge("Group", "G1"),
                edge("ServiceAccount", "S1"),
                edge("Group", "G2"),
            ],
        )
        .expect("access");

        assert_eq!(
            resource.groups_access,
            vec![
                AccessGroup {
                    group_id: "G1".into(),
                    security_policy_id: Some("P1".into()),
                },
                AccessGroup {
                    group_id: "G2".into(),
                    security_policy_id: Some("P1".into()),
                },
            ]
        );
        assert_eq!(resource.service_accounts, vec!["S1".to_string()]);
    }

    #[test]
    fn access_without_id_is_rejected() {
        let mut resource = Resource::default();
        let err = apply_access(&mut resource, vec![edge("Group", "")]).expect_err("missing id");
        assert_eq!(err.to_string(), "access group ID is missing in response");

        let err = apply_access(&mut resource, vec![edge("ServiceAccount", "")])
            .expect_err("missing id");
        assert_eq!(
            err.to_string(),
            "access service account ID is missing in response"
        );
    }

    #[test]
    fn resource_node_to_model() {
        let response: ReadResource = serde_json::from_value(json!({
            "resource": {
                "id": "R1",
                "name": "db",
                "address": {"value": "10.0.0.1"},
                "remoteNetwork": {"id": "N1"},
                "protocols": null,
                "isActive": true,
                "isVisible": false,
                "isBrowserShortcutEnabled": false,
                "alias": "",
                "securityPolicy": null,
                "tags": [{"key": "env", "value": "prod"}],
                "access": {
                    "pageInfo": {"endCursor": null, "hasNextPage": false},
                    "edges": []
                }
            }
        }))
        .expect("decode");

        let node = response.resource.expect("resource");
        assert!(node.access.edges.is_empty());
        let resource = Resource::from(node.node);
        assert_eq!(resource.address, "10.0.0.1");
        assert_eq!(resource.remote_network_id, "N1");
        assert_eq!(resource.protocols.tcp.policy, POLICY_ALLOW_ALL);
        assert!(resource.alias.is_none());
        assert_eq!(resource.tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(tags_input(&resource), json!([{"key": "env", "value": "prod"}]));
    }
}
