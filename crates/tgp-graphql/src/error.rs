//! Error types for the GraphQL transport.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ContextError;

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
    /// Whether the error happened while sending the request.
    pub is_request: bool,
}

impl HttpErrorInfo {
    /// Certificate name mismatches will not heal on retry.
    ///
    /// reqwest does not type this failure, so the message text is matched.
    pub fn is_certificate_mismatch(&self) -> bool {
        const PATTERNS: [&str; 3] = [
            "certificate name does not match input",
            "certificate is valid for",
            "NotValidForName",
        ];
        PATTERNS.iter().any(|pattern| self.message.contains(pattern))
    }
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        // reqwest hides the root cause behind "error sending request".
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Self {
            message,
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
            is_request: err.is_request(),
        }
    }
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the document (1-based).
    pub line: u32,
    /// Column number in the document (1-based).
    pub column: u32,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// Location(s) within the document.
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Path within the response where the error occurred.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// Extensions metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// Error type for transport operations.
#[derive(Debug, Clone, Error)]
pub enum GraphqlClientError {
    /// Network failure before a response arrived.
    #[error("can't execute http request: {}", .0.message)]
    Http(HttpErrorInfo),

    /// Server answered with a non-2xx status.
    #[error("request {url} failed, status {}, body {body}", .status.as_u16())]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: StatusCode,
        /// Response body, verbatim.
        body: String,
        /// Retry-After duration when supplied.
        retry_after: Option<Duration>,
    },

    /// Request or response JSON could not be processed.
    #[error("JSON error: {0}")]
    Json(String),

    /// GraphQL errors returned alongside HTTP 200.
    #[error("{}", join_messages(.errors))]
    GraphqlErrors {
        /// GraphQL error list.
        errors: Vec<GraphqlError>,
    },

    /// GraphQL protocol violation.
    #[error("GraphQL protocol error: {message}")]
    Protocol {
        /// Details.
        message: String,
    },

    /// A header value could not be encoded.
    #[error("invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Details.
        message: String,
    },

    /// The request context ended the call.
    #[error(transparent)]
    Context(#[from] ContextError),
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for GraphqlClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for GraphqlClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl GraphqlClientError {
    /// Returns `true` for transport-level failures worth another attempt.
    ///
    /// GraphQL errors delivered with HTTP 200 are decisions, not failures,
    /// and are never retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(info) => {
                (info.is_timeout || info.is_connect || info.is_request)
                    && !info.is_certificate_mismatch()
            }
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Server-suggested delay before the next attempt.
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::HttpStatus { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
