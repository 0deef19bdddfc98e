//! Service account and service account key documents.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, EntityResponse, IdName, IdNode, MutationResponse, OkError, QueryResponse};
use crate::error::ConversionError;
use crate::model::{KEY_STATUS_ACTIVE, ServiceAccount, ServiceAccountKey};

pub const CURSOR_SERVICES: &str = "servicesEndCursor";
pub const CURSOR_RESOURCES: &str = "resourcesEndCursor";
pub const CURSOR_KEYS: &str = "keysEndCursor";

macro_rules! resources_connection {
    () => {
        concat!(
            "resources(after: $resourcesEndCursor, first: $pageLimit) { ",
            page_info!(),
            " edges { node { id isActive } } }"
        )
    };
}

macro_rules! keys_connection {
    () => {
        concat!(
            "keys(after: $keysEndCursor, first: $pageLimit) { ",
            page_info!(),
            " edges { node { id status } } }"
        )
    };
}

macro_rules! key_fields {
    () => {
        "id name expiresAt status serviceAccount { id }"
    };
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdNode {
    pub id: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyIdNode {
    pub id: String,
    #[serde(default)]
    pub status: String,
}

pub type ResourceIds = PaginatedResource<Edge<ResourceIdNode>>;
pub type KeyIds = PaginatedResource<Edge<KeyIdNode>>;

/// Ids of active resources, in page order.
pub fn active_resources(resources: ResourceIds) -> Vec<String> {
    resources
        .edges
        .into_iter()
        .filter(|edge| edge.node.is_active)
        .map(|edge| edge.node.id)
        .collect()
}

/// Ids of active keys, in page order.
pub fn active_keys(keys: KeyIds) -> Vec<String> {
    keys.edges
        .into_iter()
        .filter(|edge| edge.node.status == KEY_STATUS_ACTIVE)
        .map(|edge| edge.node.id)
        .collect()
}

impl From<IdName> for ServiceAccount {
    fn from(node: IdName) -> Self {
        Self {
            id: node.id,
            name: node.name,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resources: ResourceIds,
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub keys: KeyIds,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadServiceAccount {
    pub service_account: Option<ServiceAccountNode>,
}

impl GraphqlOperation for ReadServiceAccount {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readServiceAccount";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $resourcesEndCursor: String, $keysEndCursor: String, $pageLimit: Int) ",
        "{ serviceAccount(id: $id) { id name ",
        resources_connection!(),
        " ",
        keys_connection!(),
        " } }"
    );
}

impl QueryResponse for ReadServiceAccount {
    fn is_empty(&self) -> bool {
        self.service_account.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountResourcesNode {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub resources: ResourceIds,
}

/// Follow-up page of a service account's resources.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadServiceAccountResources {
    pub service_account: Option<ServiceAccountResourcesNode>,
}

impl GraphqlOperation for ReadServiceAccountResources {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readServiceAccountResources";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $resourcesEndCursor: String, $pageLimit: Int) ",
        "{ serviceAccount(id: $id) { ",
        resources_connection!(),
        " } }"
    );
}

impl QueryResponse for ReadServiceAccountResources {
    fn is_empty(&self) -> bool {
        self.service_account.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKeysNode {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub keys: KeyIds,
}

/// Follow-up page of a service account's keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadServiceAccountKeys {
    pub service_account: Option<ServiceAccountKeysNode>,
}

impl GraphqlOperation for ReadServiceAccountKeys {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readServiceAccountKeys";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $keysEndCursor: String, $pageLimit: Int) ",
        "{ serviceAccount(id: $id) { ",
        keys_connection!(),
        " } }"
    );
}

impl QueryResponse for ReadServiceAccountKeys {
    fn is_empty(&self) -> bool {
        self.service_account.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadServiceAccounts {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_accounts: PaginatedResource<Edge<IdName>>,
}

impl GraphqlOperation for ReadServiceAccounts {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readServiceAccounts";
    const DOCUMENT: &'static str = concat!(
        "($filter: ServiceAccountFilterInput, $servicesEndCursor: String, $pageLimit: Int) ",
        "{ serviceAccounts(filter: $filter, after: $servicesEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { id name } } } }"
    );
}

impl QueryResponse for ReadServiceAccounts {
    fn is_empty(&self) -> bool {
        self.service_accounts.edges.is_empty()
    }
}

/// Service account without its resources or keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadShallowServiceAccount {
    pub service_account: Option<IdName>,
}

impl GraphqlOperation for ReadShallowServiceAccount {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readShallowServiceAccount";
    const DOCUMENT: &'static str = "($id: ID!) { serviceAccount(id: $id) { id name } }";
}

impl QueryResponse for ReadShallowServiceAccount {
    fn is_empty(&self) -> bool {
        self.service_account.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadShallowServiceAccounts {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_accounts: PaginatedResource<Edge<IdName>>,
}

impl GraphqlOperation for ReadShallowServiceAccounts {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readShallowServiceAccounts";
    const DOCUMENT: &'static str = concat!(
        "($servicesEndCursor: String, $pageLimit: Int) ",
        "{ serviceAccounts(after: $servicesEndCursor, first: $pageLimit) { ",
        page_info!(),
        " edges { node { id name } } } }"
    );
}

impl QueryResponse for ReadShallowServiceAccounts {
    fn is_empty(&self) -> bool {
        self.service_accounts.edges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceAccount {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_create: EntityResponse<IdName>,
}

mutation_payload!(CreateServiceAccount, service_account_create);

impl GraphqlOperation for CreateServiceAccount {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "createServiceAccount";
    const DOCUMENT: &'static str = concat!(
        "($name: String!, $resourceIds: [ID]) ",
        "{ serviceAccountCreate(name: $name, resourceIds: $resourceIds) ",
        "{ ok error entity { id name } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceAccount {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_update: EntityResponse<IdName>,
}

mutation_payload!(UpdateServiceAccount, service_account_update);

impl GraphqlOperation for UpdateServiceAccount {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateServiceAccount";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $name: String, $addedResourceIds: [ID], $removedResourceIds: [ID]) ",
        "{ serviceAccountUpdate(id: $id, name: $name, addedResourceIds: $addedResourceIds, ",
        "removedResourceIds: $removedResourceIds) { ok error entity { id name } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveServiceAccountResources {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_update: OkError,
}

mutation_payload!(RemoveServiceAccountResources, service_account_update);

impl GraphqlOperation for RemoveServiceAccountResources {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateServiceAccountRemoveResources";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $removedResourceIds: [ID]) ",
        "{ serviceAccountUpdate(id: $id, removedResourceIds: $removedResourceIds) { ok error } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteServiceAccount {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_delete: OkError,
}

mutation_payload!(DeleteServiceAccount, service_account_delete);

impl GraphqlOperation for DeleteServiceAccount {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "deleteServiceAccount";
    const DOCUMENT: &'static str = "($id: ID!) { serviceAccountDelete(id: $id) { ok error } }";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service_account: IdNode,
}

impl KeyNode {
    pub fn into_model(self, now: DateTime<Utc>) -> Result<ServiceAccountKey, ConversionError> {
        let expiration_time = match self.expires_at.as_deref() {
            None | Some("") => 0,
            Some(expires_at) => days_until_expiration(expires_at, now)?,
        };
        Ok(ServiceAccountKey {
            id: self.id,
            name: self.name,
            service_account_id: self.service_account.id,
            expiration_time,
            status: self.status,
            token: None,
        })
    }
}

/// Whole days left until `expires_at`, counting the current partial day.
pub fn days_until_expiration(expires_at: &str, now: DateTime<Utc>) -> Result<i64, ConversionError> {
    const HOURS_IN_DAY: i64 = 24;

    let expires = DateTime::parse_from_rfc3339(expires_at).map_err(|err| {
        ConversionError(format!(
            "failed to parse expiration time `{expires_at}`: {err}"
        ))
    })?;
    let hours = (expires.with_timezone(&Utc) - now).num_hours();
    Ok(hours / HOURS_IN_DAY + 1)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadServiceAccountKey {
    pub service_account_key: Option<KeyNode>,
}

impl GraphqlOperation for ReadServiceAccountKey {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readServiceAccountKey";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!) { serviceAccountKey(id: $id) { ",
        key_fields!(),
        " } }"
    );
}

impl QueryResponse for ReadServiceAccountKey {
    fn is_empty(&self) -> bool {
        self.service_account_key.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KeyCreatePayload {
    #[serde(default)]
    pub entity: Option<KeyNode>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub status: OkError,
}

impl QueryResponse for KeyCreatePayload {
    fn is_empty(&self) -> bool {
        self.entity.is_none()
    }
}

impl MutationResponse for KeyCreatePayload {
    fn ok(&self) -> bool {
        self.status.ok()
    }

    fn error_message(&self) -> &str {
        self.status.error_message()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceAccountKey {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_key_create: KeyCreatePayload,
}

mutation_payload!(CreateServiceAccountKey, service_account_key_create);

impl GraphqlOperation for CreateServiceAccountKey {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "createServiceAccountKey";
    const DOCUMENT: &'static str = concat!(
        "($serviceAccountId: ID!, $name: String, $expirationTime: Int!) ",
        "{ serviceAccountKeyCreate(serviceAccountId: $serviceAccountId, name: $name, ",
        "expirationTime: $expirationTime) { ok error token entity { ",
        key_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceAccountKey {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_key_update: EntityResponse<KeyNode>,
}

mutation_payload!(UpdateServiceAccountKey, service_account_key_update);

impl GraphqlOperation for UpdateServiceAccountKey {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "updateServiceAccountKey";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $name: String) { serviceAccountKeyUpdate(id: $id, name: $name) ",
        "{ ok error entity { ",
        key_fields!(),
        " } } }"
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteServiceAccountKey {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_key_delete: OkError,
}

mutation_payload!(DeleteServiceAccountKey, service_account_key_delete);

impl GraphqlOperation for DeleteServiceAccountKey {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "deleteServiceAccountKey";
    const DOCUMENT: &'static str =
        "($id: ID!) { serviceAccountKeyDelete(id: $id) { ok error } }";
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeServiceAccountKey {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub service_account_key_revoke: OkError,
}

mutation_payload!(RevokeServiceAccountKey, service_account_key_revoke);

impl GraphqlOperation for RevokeServiceAccountKey {
    const KIND: OperationKind = OperationKind::Mutation;
    const OPERATION_NAME: &'static str = "revokeServiceAccountKey";
    const DOCUMENT: &'static str =
        "($id: ID!) { serviceAccountKeyRevoke(id: $id) { ok error } }";
}
