//! Twingate API client.
//!
//! Entity operations live in one submodule per entity; they all go through
//! [`TwingateClient::query`] and [`TwingateClient::mutate`], which hold a
//! rate-limit permit for the duration of the call and normalize every failure
//! into an [`ApiError`](crate::ApiError).

mod connector;
mod dlp_policy;
mod dns_filtering_profile;
mod group;
mod remote_network;
mod resource;
mod security_policy;
mod service_account;
mod service_account_key;
mod user;

use std::sync::Arc;

use tgp_graphql::{
    GraphqlClient, GraphqlClientBuilder, GraphqlClientError, GraphqlOperation, PaginatedResource,
    RequestContext, Variables, concat_operations,
};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{Level, debug, info, instrument};

use crate::config::TwingateConfig;
use crate::error::{ApiError, ApiResult, Cause, MutationError, Operation, Target, TwingateResult};
use crate::logging::{SENSITIVE_KEYS, redact_sensitive};
use crate::query::{Edge, MutationResponse, QueryResponse};

/// Client for the Twingate GraphQL and REST APIs.
///
/// Cheap to clone; clones share the connection pool and the rate limit.
#[derive(Debug, Clone)]
pub struct TwingateClient {
    graphql: GraphqlClient,
    page_limit: usize,
    limiter: Arc<Semaphore>,
}

impl TwingateClient {
    /// Build a client from validated configuration.
    pub fn new(config: &TwingateConfig) -> TwingateResult<Self> {
        config.validate()?;

        let graphql = GraphqlClientBuilder::new(config.graphql_url())
            .with_rest_url(config.rest_url())
            .with_bearer_token(&config.api_token)
            .with_user_agent(config.user_agent())
            .with_timeout(config.http_timeout)
            .with_retry_policy(config.retry_policy())
            .build()?;

        info!(
            url = %graphql.endpoint(),
            page_limit = config.page_limit,
            rate_limit = config.rate_limit,
            "twingate client created"
        );

        Ok(Self::from_transport(
            graphql,
            config.page_limit,
            config.rate_limit,
        ))
    }

    /// Wrap an existing transport.
    pub fn from_transport(graphql: GraphqlClient, page_limit: usize, rate_limit: usize) -> Self {
        Self {
            graphql,
            page_limit: page_limit.max(1),
            limiter: Arc::new(Semaphore::new(rate_limit.max(1))),
        }
    }

    pub const fn transport(&self) -> &GraphqlClient {
        &self.graphql
    }

    pub const fn page_limit(&self) -> usize {
        self.page_limit
    }

    /// Calls that may start right now without waiting for the rate limit.
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }

    async fn acquire(&self, ctx: &RequestContext) -> Result<SemaphorePermit<'_>, GraphqlClientError> {
        ctx.run(self.limiter.acquire())
            .await?
            .map_err(|_| GraphqlClientError::Protocol {
                message: "rate limiter closed".to_string(),
            })
    }

    async fn execute<O: GraphqlOperation>(
        &self,
        ctx: &RequestContext,
        variables: &Variables,
    ) -> Result<O, GraphqlClientError> {
        let _permit = self.acquire(ctx).await?;
        if tracing::enabled!(Level::DEBUG) {
            let redacted = redact_sensitive(&variables.clone().into_value(), SENSITIVE_KEYS);
            debug!(variables = %redacted, "executing operation");
        }
        self.graphql.execute::<O>(ctx, variables).await
    }

    /// Run a read; an empty result is an error.
    #[instrument(skip_all, fields(operation = %operation.name(), target = ?target))]
    pub(crate) async fn query<Q>(
        &self,
        ctx: &RequestContext,
        variables: &Variables,
        operation: Operation,
        target: Target,
    ) -> ApiResult<Q>
    where
        Q: GraphqlOperation + QueryResponse,
    {
        let response = self
            .execute::<Q>(ctx, variables)
            .await
            .map_err(|err| operation.error(err, target.clone()))?;

        if response.is_empty() {
            return Err(operation.error(Cause::EmptyResult, target));
        }
        Ok(response)
    }

    /// Run a mutation: transport failure, then `ok: false`, then emptiness.
    #[instrument(skip_all, fields(operation = %operation.name(), target = ?target))]
    pub(crate) async fn mutate<M>(
        &self,
        ctx: &RequestContext,
        variables: &Variables,
        operation: Operation,
        target: Target,
    ) -> ApiResult<M>
    where
        M: GraphqlOperation + MutationResponse,
    {
        let response = self
            .execute::<M>(ctx, variables)
            .await
            .map_err(|err| operation.error(err, target.clone()))?;

        if !response.ok() {
            return Err(operation.error(
                MutationError::new(response.error_message()),
                target,
            ));
        }
        if response.is_empty() {
            return Err(operation.error(Cause::EmptyResult, target));
        }
        Ok(response)
    }

    /// Follow `resource` to its last page with `Q` as the continuation.
    ///
    /// Each follow-up binds `cursor` to the previous page's end cursor and
    /// runs through [`Self::query`], so an empty follow-up page is an error.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn fetch_remaining<Q, N>(
        &self,
        ctx: &RequestContext,
        resource: &mut PaginatedResource<N>,
        variables: &Variables,
        cursor: &'static str,
        operation: Operation,
        target: &Target,
        page: fn(Q) -> PaginatedResource<N>,
    ) -> ApiResult<()>
    where
        Q: GraphqlOperation + QueryResponse,
    {
        resource
            .fetch_pages(ctx, variables, move |ctx, mut variables, after| {
                let target = target.clone();
                async move {
                    variables.set_cursor(cursor, &after);
                    let response = self.query::<Q>(&ctx, &variables, operation, target).await?;
                    Ok::<_, ApiError>(page(response))
                }
            })
            .await
            .map_err(|err| err.into_fetch_or(|err| operation.error(err, target.clone())))
    }
}

/// Context for calls made on behalf of `parent`, prefixing their operation
/// names with it.
pub(crate) fn nested(ctx: &RequestContext, parent: Operation) -> RequestContext {
    let caller = concat_operations([ctx.caller().unwrap_or_default(), parent.name().as_str()]);
    ctx.clone().with_caller(caller)
}

/// Treat an empty result as `None`.
pub(crate) fn allow_empty<T>(result: ApiResult<T>) -> ApiResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_empty_result() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Value the emptiness check already guaranteed.
pub(crate) fn required<T>(value: Option<T>, operation: Operation, target: Target) -> ApiResult<T> {
    value.ok_or_else(|| operation.error(Cause::EmptyResult, target))
}

/// Convert every node of a connection into its model.
pub(crate) fn nodes<N, M: From<N>>(resource: PaginatedResource<Edge<N>>) -> Vec<M> {
    resource
        .edges
        .into_iter()
        .map(|edge| M::from(edge.node))
        .collect()
}
