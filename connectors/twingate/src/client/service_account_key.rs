use chrono::Utc;
use tgp_graphql::{RequestContext, Variables};

use super::{TwingateClient, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::ServiceAccountKey;
use crate::query::service_account::{
    CreateServiceAccountKey, DeleteServiceAccountKey, ReadServiceAccountKey,
    RevokeServiceAccountKey, UpdateServiceAccountKey,
};

impl TwingateClient {
    /// Issue a key; the returned model is the only one carrying the token.
    ///
    /// `expiration_time` is in days, 0 for a key that never expires.
    pub async fn create_service_account_key(
        &self,
        ctx: &RequestContext,
        key: &ServiceAccountKey,
    ) -> ApiResult<ServiceAccountKey> {
        let operation = ResourceKind::ServiceAccountKey.create();
        let target = Target::name(&key.name);
        if key.service_account_id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new()
            .id_named("serviceAccountId", &key.service_account_id)
            .nullable("name", key.name.clone())
            .value("expirationTime", key.expiration_time);

        let response: CreateServiceAccountKey = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        let payload = response.service_account_key_create;
        let node = required(payload.entity, operation, target.clone())?;

        let mut created = node
            .into_model(Utc::now())
            .map_err(|err| operation.error(err, target))?;
        created.token = payload.token;
        Ok(created)
    }

    pub async fn read_service_account_key(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> ApiResult<ServiceAccountKey> {
        let operation = ResourceKind::ServiceAccountKey.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let response: ReadServiceAccountKey = self
            .query(ctx, &Variables::new().id(id), operation, target.clone())
            .await?;
        required(response.service_account_key, operation, target.clone())?
            .into_model(Utc::now())
            .map_err(|err| operation.error(err, target))
    }

    /// Rename a key.
    pub async fn update_service_account_key(
        &self,
        ctx: &RequestContext,
        key: &ServiceAccountKey,
    ) -> ApiResult<ServiceAccountKey> {
        let operation = ResourceKind::ServiceAccountKey.update();
        let target = Target::id(&key.id);
        if key.id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new()
            .id(&key.id)
            .nullable("name", key.name.clone());

        let response: UpdateServiceAccountKey = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.service_account_key_update.entity, operation, target.clone())?
            .into_model(Utc::now())
            .map_err(|err| operation.error(err, target))
    }

    pub async fn delete_service_account_key(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let operation = ResourceKind::ServiceAccountKey.delete();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let _: DeleteServiceAccountKey = self
            .mutate(ctx, &Variables::new().id(id), operation, target)
            .await?;
        Ok(())
    }

    /// Revoke a key; it stays readable with status `REVOKED`.
    pub async fn revoke_service_account_key(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let operation = ResourceKind::ServiceAccountKey.revoke();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let _: RevokeServiceAccountKey = self
            .mutate(ctx, &Variables::new().id(id), operation, target)
            .await?;
        Ok(())
    }
}
