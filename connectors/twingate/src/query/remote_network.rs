//! Remote network documents.

use serde::Deserialize;
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, EntityResponse, OkError, QueryResponse};
use crate::model::RemoteNetwork;

pub const CURSOR_REMOTE_NETWORKS: &str = "remoteNetworksEndCursor";

macro_rules! remote_network_fields {
    () => {
        "id name location"
    };
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteNetworkNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
}

impl From<RemoteNetworkNode> for RemoteNetwork {
    fn from(node: RemoteNetworkNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            location: node.location,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRemoteNetworkById {
    pub remote_network: Option<RemoteNetworkNode>,
}

impl GraphqlOperation for ReadRemoteNetworkById {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readRemoteNetwork";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!) { remoteNetwork(id: $id) { ",
        remote_network_fields!(),
        " } }"
    );
}

impl QueryResponse for ReadRemoteNetworkById {
    fn is_empty(&self) -> bool {
        self.remote_network.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoteNetworkEdges {
    #[serde(default)]
    pub edges: Vec<Edge<RemoteNetworkNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRemoteNetworkByName {
    #[serde(default)]
    pub remote_networks: RemoteNetworkEdges,
}

impl ReadRemoteNetworkByName {
    /// First match, the server orders exact name matches first.
    pub fn into_first(self) -> Option<RemoteNetworkNode> {
        self.remote_networks
            .edges
            .into_iter()
            .next()
            .map(|edge| edge.node)
    }
}

impl GraphqlOperation for ReadRemoteNetworkByName {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readRemoteNetwork";
    const DOCUMENT: &'static str = concat!(
        "($name: String!) { remoteNetworks(filter: {name: {eq: $name}}) { edges { node { ",
        remote_network_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadRemoteNetworkByName {
    fn is_empty(&self) -> bool {
        self.remote_networks.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRemoteNetworks {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub remote_networks: PaginatedResource<Edge<RemoteNetworkNode>>,
}

impl GraphqlOperation for ReadRemoteNetworks {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readRemoteNetworks";
    const DOCUMENT: &'static str = concat!(
        "($remoteNetworksEndCursor: String, $pageLimit: Int) ",
        "{ remoteNetworks(after: $remoteNetworksEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { ",
        remote_network_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadRemoteNetworks {
    fn is_empty(&self) -> bool {
        self.remote_networks.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRemoteNetwork {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub remote_network_create: EntityResponse<RemoteNetworkNode>,
}

mutation_payload!(CreateRemoteNetwork, remote_network_create);

impl GraphqlOperation for CreateRemoteNetwork {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "createRemoteNetwork";
    const DOCUMENT: &'static str = concat!(
        "($name: String!, $isActive: Boolean!, $location: RemoteNetworkLocation) ",
        "{ remoteNetworkCreate(name: $name, isActive: $isActive, location: $location) ",
        "{ ok error entity { ",
        remote_network_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRemoteNetwork {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub remote_network_update: EntityResponse<RemoteNetworkNode>,
}

mutation_payload!(UpdateRemoteNetwork, remote_network_update);

impl GraphqlOperation for UpdateRemoteNetwork {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateRemoteNetwork";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $name: String, $location: RemoteNetworkLocation) ",
        "{ remoteNetworkUpdate(id: $id, name: $name, location: $location) ",
        "{ ok error entity { ",
        remote_network_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRemoteNetwork {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub remote_network_delete: OkError,
}

mutation_payload!(DeleteRemoteNetwork, remote_network_delete);

impl GraphqlOperation for DeleteRemoteNetwork {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "deleteRemoteNetwork";
    const DOCUMENT: &'static str = "($id: ID!) { remoteNetworkDelete(id: $id) { ok error } }";
}
