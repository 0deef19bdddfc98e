use tgp_graphql::{RequestContext, Variables};

use super::{TwingateClient, allow_empty, nodes, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::RemoteNetwork;
use crate::query::remote_network::{
    CURSOR_REMOTE_NETWORKS, CreateRemoteNetwork, DeleteRemoteNetwork, ReadRemoteNetworkById,
    ReadRemoteNetworkByName, ReadRemoteNetworks, UpdateRemoteNetwork,
};

impl TwingateClient {
    pub async fn create_remote_network(
        &self,
        ctx: &RequestContext,
        network: &RemoteNetwork,
    ) -> ApiResult<RemoteNetwork> {
        let operation = ResourceKind::RemoteNetwork.create();
        let target = Target::name(&network.name);
        if network.name.is_empty() {
            return Err(operation.error(Precondition::NetworkNameIsEmpty, target));
        }

        let variables = Variables::new()
            .value("name", network.name.as_str())
            .value("isActive", true)
            .nullable("location", network.location.clone());

        let response: CreateRemoteNetwork = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.remote_network_create.entity, operation, target)
            .map(RemoteNetwork::from)
    }

    /// Read by id when one is given, otherwise by name.
    pub async fn read_remote_network(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
    ) -> ApiResult<RemoteNetwork> {
        if id.is_empty() {
            self.read_remote_network_by_name(ctx, name).await
        } else {
            self.read_remote_network_by_id(ctx, id).await
        }
    }

    pub async fn read_remote_network_by_id(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> ApiResult<RemoteNetwork> {
        let operation = ResourceKind::RemoteNetwork.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::NetworkIdIsEmpty, target));
        }

        let response: ReadRemoteNetworkById = self
            .query(ctx, &Variables::new().id(id), operation, target.clone())
            .await?;
        required(response.remote_network, operation, target).map(RemoteNetwork::from)
    }

    /// First remote network whose name matches exactly.
    pub async fn read_remote_network_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> ApiResult<RemoteNetwork> {
        let operation = ResourceKind::RemoteNetwork.read();
        let target = Target::name(name);
        if name.is_empty() {
            return Err(operation.error(Precondition::NetworkNameIsEmpty, target));
        }

        let variables = Variables::new().value("name", name);
        let response: ReadRemoteNetworkByName = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        required(response.into_first(), operation, target).map(RemoteNetwork::from)
    }

    /// Every remote network; an account without any yields an empty list.
    pub async fn read_remote_networks(&self, ctx: &RequestContext) -> ApiResult<Vec<RemoteNetwork>> {
        let operation = ResourceKind::RemoteNetwork.read().named("readRemoteNetworks");
        let target = Target::all();
        let variables = Variables::new()
            .cursor(CURSOR_REMOTE_NETWORKS)
            .page_limit(self.page_limit());

        let Some(mut response) = allow_empty(
            self.query::<ReadRemoteNetworks>(ctx, &variables, operation, target.clone())
                .await,
        )?
        else {
            return Ok(Vec::new());
        };

        self.fetch_remaining(
            ctx,
            &mut response.remote_networks,
            &variables,
            CURSOR_REMOTE_NETWORKS,
            operation,
            &target,
            |page: ReadRemoteNetworks| page.remote_networks,
        )
        .await?;

        Ok(nodes(response.remote_networks))
    }

    pub async fn update_remote_network(
        &self,
        ctx: &RequestContext,
        network: &RemoteNetwork,
    ) -> ApiResult<RemoteNetwork> {
        let operation = ResourceKind::RemoteNetwork.update();
        let target = Target::id(&network.id);
        if network.id.is_empty() {
            return Err(operation.error(Precondition::NetworkIdIsEmpty, target));
        }

        let variables = Variables::new()
            .id(&network.id)
            .nullable("name", network.name.clone())
            .nullable("location", network.location.clone());

        let response: UpdateRemoteNetwork = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.remote_network_update.entity, operation, target)
            .map(RemoteNetwork::from)
    }

    pub async fn delete_remote_network(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let operation = ResourceKind::RemoteNetwork.delete();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::NetworkIdIsEmpty, target));
        }

        let _: DeleteRemoteNetwork = self
            .mutate(ctx, &Variables::new().id(id), operation, target)
            .await?;
        Ok(())
    }
}
