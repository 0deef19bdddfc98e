//! Operation types and typed GraphQL traits.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{GraphqlClientError, GraphqlError};
use crate::variables::Variables;

/// GraphQL operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Read-only query.
    Query,
    /// State-changing mutation.
    Mutation,
}

impl OperationKind {
    /// Keyword that opens the document.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

/// Typed GraphQL operation definition.
///
/// The implementing type is the decoded `data` object of the response.
/// `DOCUMENT` holds everything after the operation name (variable
/// definitions and selection set); the name itself is supplied at call time
/// so callers can prefix it.
pub trait GraphqlOperation: DeserializeOwned + Send {
    /// Query or mutation.
    const KIND: OperationKind;
    /// Default operation name (used for observability and routing).
    const OPERATION_NAME: &'static str;
    /// Variable definitions and selection set.
    const DOCUMENT: &'static str;

    /// Full document text for `operation_name`.
    fn document(operation_name: &str) -> String {
        format!(
            "{} {}{}",
            Self::KIND.keyword(),
            operation_name,
            Self::DOCUMENT
        )
    }
}

/// Join non-empty operation name parts with `_`.
pub fn concat_operations<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// GraphQL request payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a> {
    /// Document text.
    pub query: String,
    /// Variables.
    pub variables: &'a Variables,
    /// Operation name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl<'a> GraphqlRequest<'a> {
    /// Create a new request.
    #[must_use]
    pub fn new(query: impl Into<String>, variables: &'a Variables) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
        }
    }

    /// Attach an operation name.
    #[must_use]
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// GraphQL response container.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    /// Response data.
    #[serde(default)]
    pub data: Option<T>,
    /// GraphQL errors.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
    /// Extensions payload.
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl<T> GraphqlResponse<T> {
    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Data, or the GraphQL errors that replaced it.
    pub fn into_result(self) -> Result<T, GraphqlClientError> {
        if !self.errors.is_empty() {
            return Err(GraphqlClientError::GraphqlErrors {
                errors: self.errors,
            });
        }
        self.data.ok_or_else(|| GraphqlClientError::Protocol {
            message: "missing GraphQL data".to_string(),
        })
    }
}
