use tgp_graphql::{RequestContext, Variables};
use tracing::debug;

use super::{TwingateClient, allow_empty, nested, nodes, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::{NameFilter, ServiceAccount, ServiceAccountUpdate};
use crate::query::name_filter;
use crate::query::service_account::{
    CURSOR_KEYS, CURSOR_RESOURCES, CURSOR_SERVICES, CreateServiceAccount, DeleteServiceAccount,
    ReadServiceAccount, ReadServiceAccountKeys, ReadServiceAccountResources, ReadServiceAccounts,
    ReadShallowServiceAccount, ReadShallowServiceAccounts, RemoveServiceAccountResources,
    UpdateServiceAccount, active_keys, active_resources,
};

impl TwingateClient {
    /// Create a service account, optionally with initial resource access.
    pub async fn create_service_account(
        &self,
        ctx: &RequestContext,
        account: &ServiceAccount,
    ) -> ApiResult<ServiceAccount> {
        let operation = ResourceKind::ServiceAccount.create();
        let target = Target::name(&account.name);
        if account.name.is_empty() {
            return Err(operation.error(Precondition::NameIsEmpty, target));
        }

        let variables = Variables::new()
            .value("name", account.name.as_str())
            .ids("resourceIds", &account.resources);

        let response: CreateServiceAccount = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.service_account_create.entity, operation, target)
            .map(ServiceAccount::from)
    }

    /// Read a service account with its active resources and active keys.
    pub async fn read_service_account(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> ApiResult<ServiceAccount> {
        let operation = ResourceKind::ServiceAccount.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new()
            .id(id)
            .cursor(CURSOR_RESOURCES)
            .cursor(CURSOR_KEYS)
            .page_limit(self.page_limit());
        let response: ReadServiceAccount = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        let mut node = required(response.service_account, operation, target.clone())?;

        let child = nested(ctx, operation);
        self.fetch_remaining(
            &child,
            &mut node.resources,
            &variables,
            CURSOR_RESOURCES,
            operation.named("readServiceAccountResources"),
            &target,
            |page: ReadServiceAccountResources| {
                page.service_account
                    .map(|node| node.resources)
                    .unwrap_or_default()
            },
        )
        .await?;
        self.fetch_remaining(
            &child,
            &mut node.keys,
            &variables,
            CURSOR_KEYS,
            operation.named("readServiceAccountKeys"),
            &target,
            |page: ReadServiceAccountKeys| {
                page.service_account
                    .map(|node| node.keys)
                    .unwrap_or_default()
            },
        )
        .await?;

        Ok(ServiceAccount {
            id: node.id,
            name: node.name,
            resources: active_resources(node.resources),
            keys: active_keys(node.keys),
        })
    }

    /// Read a service account's id and name only.
    pub async fn read_shallow_service_account(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> ApiResult<ServiceAccount> {
        let operation = ResourceKind::ServiceAccount.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let response: ReadShallowServiceAccount = self
            .query(ctx, &Variables::new().id(id), operation, target.clone())
            .await?;
        required(response.service_account, operation, target).map(ServiceAccount::from)
    }

    /// Every service account, without resources or keys. None at all is an
    /// error.
    pub async fn read_shallow_service_accounts(
        &self,
        ctx: &RequestContext,
    ) -> ApiResult<Vec<ServiceAccount>> {
        let operation = ResourceKind::ServiceAccount
            .read()
            .named("readShallowServiceAccounts");
        let target = Target::all();
        let variables = Variables::new()
            .cursor(CURSOR_SERVICES)
            .page_limit(self.page_limit());

        let mut response: ReadShallowServiceAccounts = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        self.fetch_remaining(
            ctx,
            &mut response.service_accounts,
            &variables,
            CURSOR_SERVICES,
            operation,
            &target,
            |page: ReadShallowServiceAccounts| page.service_accounts,
        )
        .await?;

        Ok(nodes(response.service_accounts))
    }

    /// Service accounts, optionally only those named exactly `name`.
    ///
    /// Accounts are returned without resources or keys; no match yields an
    /// empty list.
    pub async fn read_service_accounts(
        &self,
        ctx: &RequestContext,
        name: Option<&str>,
    ) -> ApiResult<Vec<ServiceAccount>> {
        let operation = ResourceKind::ServiceAccount.read().named("readServiceAccounts");
        let target = Target::all();
        let variables = Variables::new()
            .value("filter", name_filter(name, NameFilter::Exact))
            .cursor(CURSOR_SERVICES)
            .page_limit(self.page_limit());

        let Some(mut response) = allow_empty(
            self.query::<ReadServiceAccounts>(ctx, &variables, operation, target.clone())
                .await,
        )?
        else {
            return Ok(Vec::new());
        };

        self.fetch_remaining(
            ctx,
            &mut response.service_accounts,
            &variables,
            CURSOR_SERVICES,
            operation,
            &target,
            |page: ReadServiceAccounts| page.service_accounts,
        )
        .await?;

        Ok(nodes(response.service_accounts))
    }

    /// Rename a service account and/or change its resource access.
    pub async fn update_service_account(
        &self,
        ctx: &RequestContext,
        update: &ServiceAccountUpdate,
    ) -> ApiResult<ServiceAccount> {
        let operation = ResourceKind::ServiceAccount.update();
        let target = Target::id(&update.id);
        if update.id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }
        let name = update.name.clone().unwrap_or_default();
        if name.is_empty()
            && update.added_resource_ids.is_empty()
            && update.removed_resource_ids.is_empty()
        {
            return Err(operation.error(Precondition::NameIsEmpty, target));
        }

        let variables = Variables::new()
            .id(&update.id)
            .nullable("name", name)
            .ids("addedResourceIds", &update.added_resource_ids)
            .ids("removedResourceIds", &update.removed_resource_ids);

        let response: UpdateServiceAccount = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.service_account_update.entity, operation, target)
            .map(ServiceAccount::from)
    }

    /// Revoke a service account's access to `resource_ids`.
    ///
    /// Nothing is sent for an empty list or for an account that no longer
    /// exists.
    pub async fn remove_service_account_resources(
        &self,
        ctx: &RequestContext,
        id: &str,
        resource_ids: &[String],
    ) -> ApiResult<()> {
        let operation = ResourceKind::ServiceAccount.update();
        let target = Target::id(id);
        if resource_ids.is_empty() {
            return Ok(());
        }
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        if allow_empty(self.read_shallow_service_account(ctx, id).await)?.is_none() {
            debug!(id, "service account is gone, nothing to remove");
            return Ok(());
        }

        let variables = Variables::new()
            .id(id)
            .ids("removedResourceIds", resource_ids);
        let _: RemoveServiceAccountResources =
            self.mutate(ctx, &variables, operation, target).await?;
        Ok(())
    }

    pub async fn delete_service_account(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let operation = ResourceKind::ServiceAccount.delete();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let _: DeleteServiceAccount = self
            .mutate(ctx, &Variables::new().id(id), operation, target)
            .await?;
        Ok(())
    }
}
