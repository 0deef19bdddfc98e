//! Connector documents.

use serde::Deserialize;
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, EntityResponse, IdNode, MutationResponse, OkError, QueryResponse};
use crate::model::{Connector, ConnectorTokens};

pub const CURSOR_CONNECTORS: &str = "connectorsEndCursor";

macro_rules! connector_fields {
    () => {
        "id name remoteNetwork { id } hasStatusNotificationsEnabled"
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub remote_network: IdNode,
    #[serde(default)]
    pub has_status_notifications_enabled: bool,
}

impl From<ConnectorNode> for Connector {
    fn from(node: ConnectorNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            network_id: node.remote_network.id,
            status_updates_enabled: node.has_status_notifications_enabled,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadConnector {
    pub connector: Option<ConnectorNode>,
}

impl GraphqlOperation for ReadConnector {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readConnector";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!) { connector(id: $id) { ",
        connector_fields!(),
        " } }"
    );
}

impl QueryResponse for ReadConnector {
    fn is_empty(&self) -> bool {
        self.connector.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadConnectors {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub connectors: PaginatedResource<Edge<ConnectorNode>>,
}

impl GraphqlOperation for ReadConnectors {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readConnectors";
    const DOCUMENT: &'static str = concat!(
        "($connectorsEndCursor: String, $pageLimit: Int) ",
        "{ connectors(after: $connectorsEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { ",
        connector_fields!(),
        " } } } }"
    );
}

impl QueryResponse for ReadConnectors {
    fn is_empty(&self) -> bool {
        self.connectors.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnector {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub connector_create: EntityResponse<ConnectorNode>,
}

mutation_payload!(CreateConnector, connector_create);

impl GraphqlOperation for CreateConnector {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "createConnector";
    const DOCUMENT: &'static str = concat!(
        "($remoteNetworkId: ID!, $connectorName: String, $hasStatusNotificationsEnabled: Boolean) ",
        "{ connectorCreate(remoteNetworkId: $remoteNetworkId, name: $connectorName, ",
        "hasStatusNotificationsEnabled: $hasStatusNotificationsEnabled) ",
        "{ ok error entity { ",
        connector_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConnector {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub connector_update: EntityResponse<ConnectorNode>,
}

mutation_payload!(UpdateConnector, connector_update);

impl GraphqlOperation for UpdateConnector {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateConnector";
    const DOCUMENT: &'static str = concat!(
        "($connectorId: ID!, $connectorName: String, $hasStatusNotificationsEnabled: Boolean) ",
        "{ connectorUpdate(id: $connectorId, name: $connectorName, ",
        "hasStatusNotificationsEnabled: $hasStatusNotificationsEnabled) ",
        "{ ok error entity { ",
        connector_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConnector {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub connector_delete: OkError,
}

mutation_payload!(DeleteConnector, connector_delete);

impl GraphqlOperation for DeleteConnector {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "deleteConnector";
    const DOCUMENT: &'static str = "($id: ID!) { connectorDelete(id: $id) { ok error } }";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensNode {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokensNode> for ConnectorTokens {
    fn from(node: TokensNode) -> Self {
        Self {
            access_token: node.access_token,
            refresh_token: node.refresh_token,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensPayload {
    #[serde(default)]
    pub connector_tokens: Option<TokensNode>,
    #[serde(flatten)]
    pub status: OkError,
}

impl QueryResponse for TokensPayload {
    fn is_empty(&self) -> bool {
        self.connector_tokens.is_none()
    }
}

impl MutationResponse for TokensPayload {
    fn ok(&self) -> bool {
        self.status.ok()
    }

    fn error_message(&self) -> &str {
        self.status.error_message()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateConnectorTokens {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub connector_generate_tokens: TokensPayload,
}

mutation_payload!(GenerateConnectorTokens, connector_generate_tokens);

impl GraphqlOperation for GenerateConnectorTokens {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "generateConnectorTokens";
    const DOCUMENT: &'static str = concat!(
        "($connectorId: ID!) { connectorGenerateTokens(connectorId: $connectorId) ",
        "{ connectorTokens { accessToken refreshToken } ok error } }"
    );
}
