use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::json;
use tgp_graphql::{GraphqlClientError, RequestContext, Variables};
use tracing::debug;

use super::{TwingateClient, nodes, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::{Connector, ConnectorTokens};
use crate::query::connector::{
    CURSOR_CONNECTORS, CreateConnector, DeleteConnector, GenerateConnectorTokens, ReadConnector,
    ReadConnectors, UpdateConnector,
};

const VALIDATE_TOKENS_PATH: &str = "/connector/validate_tokens";

impl TwingateClient {
    /// Create a connector in its remote network.
    pub async fn create_connector(
        &self,
        ctx: &RequestContext,
        connector: &Connector,
    ) -> ApiResult<Connector> {
        let operation = ResourceKind::Connector.create();
        let target = Target::name(&connector.name);
        if connector.network_id.is_empty() {
            return Err(operation.error(Precondition::NetworkIdIsEmpty, target));
        }

        let variables = Variables::new()
            .id_named("remoteNetworkId", &connector.network_id)
            .nullable("connectorName", connector.name.clone())
            .value(
                "hasStatusNotificationsEnabled",
                connector.status_updates_enabled,
            );

        let response: CreateConnector = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.connector_create.entity, operation, target).map(Connector::from)
    }

    pub async fn read_connector(&self, ctx: &RequestContext, id: &str) -> ApiResult<Connector> {
        let operation = ResourceKind::Connector.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new().id(id);
        let response: ReadConnector = self.query(ctx, &variables, operation, target.clone()).await?;
        required(response.connector, operation, target).map(Connector::from)
    }

    /// Every connector of the account; none at all is an error.
    pub async fn read_connectors(&self, ctx: &RequestContext) -> ApiResult<Vec<Connector>> {
        let operation = ResourceKind::Connector.read().named("readConnectors");
        let target = Target::all();
        let variables = Variables::new()
            .cursor(CURSOR_CONNECTORS)
            .page_limit(self.page_limit());

        let mut response: ReadConnectors = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        self.fetch_remaining(
            ctx,
            &mut response.connectors,
            &variables,
            CURSOR_CONNECTORS,
            operation,
            &target,
            |page: ReadConnectors| page.connectors,
        )
        .await?;

        Ok(nodes(response.connectors))
    }

    pub async fn update_connector(
        &self,
        ctx: &RequestContext,
        connector: &Connector,
    ) -> ApiResult<Connector> {
        let operation = ResourceKind::Connector.update();
        let target = Target::id(&connector.id);
        if connector.id.is_empty() {
            return Err(operation.error(Precondition::ConnectorIdIsEmpty, target));
        }

        let variables = Variables::new()
            .id_named("connectorId", &connector.id)
            .nullable("connectorName", connector.name.clone())
            .value(
                "hasStatusNotificationsEnabled",
                connector.status_updates_enabled,
            );

        let response: UpdateConnector = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.connector_update.entity, operation, target).map(Connector::from)
    }

    pub async fn delete_connector(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let operation = ResourceKind::Connector.delete();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let _: DeleteConnector = self.mutate(ctx, &Variables::new().id(id), operation, target).await?;
        Ok(())
    }

    /// Issue a fresh access/refresh token pair for a connector.
    pub async fn generate_connector_tokens(
        &self,
        ctx: &RequestContext,
        connector_id: &str,
    ) -> ApiResult<ConnectorTokens> {
        let operation = ResourceKind::ConnectorTokens.generate();
        let target = Target::id(connector_id);
        if connector_id.is_empty() {
            return Err(operation.error(Precondition::ConnectorIdIsEmpty, target));
        }

        let variables = Variables::new().id_named("connectorId", connector_id);
        let response: GenerateConnectorTokens = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(
            response.connector_generate_tokens.connector_tokens,
            operation,
            target,
        )
        .map(ConnectorTokens::from)
    }

    /// Check a token pair against the REST API.
    ///
    /// The access token authenticates the call in place of the API token.
    pub async fn verify_connector_tokens(
        &self,
        ctx: &RequestContext,
        tokens: &ConnectorTokens,
    ) -> ApiResult<()> {
        let operation = ResourceKind::ConnectorTokens.verify();

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", tokens.access_token)).map_err(
            |err| {
                operation.error(
                    GraphqlClientError::InvalidHeader {
                        name: AUTHORIZATION.to_string(),
                        message: err.to_string(),
                    },
                    Target::None,
                )
            },
        )?;
        headers.insert(AUTHORIZATION, bearer);

        let payload = json!({ "refresh_token": tokens.refresh_token });
        self.transport()
            .post_rest(ctx, VALIDATE_TOKENS_PATH, &payload, &headers)
            .await
            .map_err(|err| operation.error(err, Target::None))?;

        debug!("connector tokens verified");
        Ok(())
    }
}
