//! Typed GraphQL documents and their response envelopes.
//!
//! Each read query decodes into a struct that knows whether the server
//! returned anything ([`QueryResponse`]); each mutation additionally carries
//! the `ok`/`error` pair of its payload ([`MutationResponse`]).

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};

use crate::model::NameFilter;

/// Emptiness check applied after every successful read.
pub trait QueryResponse {
    fn is_empty(&self) -> bool;
}

/// Outcome of a mutation payload.
pub trait MutationResponse: QueryResponse {
    fn ok(&self) -> bool;
    fn error_message(&self) -> &str;
}

/// Decode an explicit `null` as the type's default, so that an absent
/// connection or payload is judged by [`QueryResponse::is_empty`] rather than
/// failing to decode.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `ok`/`error` pair embedded in every mutation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OkError {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl QueryResponse for OkError {
    // Delete and revoke payloads carry no entity.
    fn is_empty(&self) -> bool {
        false
    }
}

impl MutationResponse for OkError {
    fn ok(&self) -> bool {
        self.ok
    }

    fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }
}

/// Mutation payload returning the affected entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct EntityResponse<T> {
    #[serde(default)]
    pub entity: Option<T>,
    #[serde(flatten)]
    pub status: OkError,
}

impl<T> Default for EntityResponse<T> {
    fn default() -> Self {
        Self {
            entity: None,
            status: OkError::default(),
        }
    }
}

impl<T> QueryResponse for EntityResponse<T> {
    fn is_empty(&self) -> bool {
        self.entity.is_none()
    }
}

impl<T> MutationResponse for EntityResponse<T> {
    fn ok(&self) -> bool {
        self.status.ok()
    }

    fn error_message(&self) -> &str {
        self.status.error_message()
    }
}

/// Implement the response traits for a mutation root by delegating to the
/// payload stored in `$field`.
macro_rules! mutation_payload {
    ($ty:ty, $field:ident) => {
        impl $crate::query::QueryResponse for $ty {
            fn is_empty(&self) -> bool {
                $crate::query::QueryResponse::is_empty(&self.$field)
            }
        }

        impl $crate::query::MutationResponse for $ty {
            fn ok(&self) -> bool {
                $crate::query::MutationResponse::ok(&self.$field)
            }

            fn error_message(&self) -> &str {
                $crate::query::MutationResponse::error_message(&self.$field)
            }
        }
    };
}

/// Selection of a connection's page info.
macro_rules! page_info {
    () => {
        "pageInfo { endCursor hasNextPage }"
    };
}

pub mod connector;
pub mod dlp_policy;
pub mod dns_filtering_profile;
pub mod group;
pub mod remote_network;
pub mod resource;
pub mod security_policy;
pub mod service_account;
pub mod user;

/// Bare node reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdNode {
    #[serde(default)]
    pub id: String,
}

/// Node with an id and a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdName {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Edge wrapping a single node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Edge<N> {
    pub node: N,
}

/// `{name: {<operator>: <name>}}` filter input, or `null` without a name.
pub fn name_filter(name: Option<&str>, filter: NameFilter) -> Value {
    match name {
        Some(name) if !name.is_empty() => {
            let mut operation = Map::new();
            operation.insert(filter.operator().to_string(), Value::from(name));
            json!({ "name": operation })
        }
        _ => Value::Null,
    }
}
