//! TGP GraphQL - resilient GraphQL-over-HTTP transport.
//!
//! This crate provides:
//! - A GraphQL/REST HTTP client with bounded, classified retries.
//! - Per-call cancellation and deadlines through [`RequestContext`].
//! - Typed operations and variable bindings.
//! - A generic cursor pagination engine.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod client;
mod context;
mod error;
mod operation;
mod pagination;
mod retry;
mod variables;

pub use client::{
    CORRELATION_ID_HEADER, CallStats, CallStatsSnapshot, GraphqlClient, GraphqlClientBuilder,
    GraphqlClientConfig, REQUEST_ID_HEADER,
};
pub use context::{ContextError, RequestContext};
pub use error::{GraphqlClientError, GraphqlError, GraphqlErrorLocation, HttpErrorInfo};
pub use operation::{
    GraphqlOperation, GraphqlRequest, GraphqlResponse, OperationKind, concat_operations,
};
pub use pagination::{
    DEFAULT_MAX_PAGES, PageError, PageGuard, PageInfo, PaginatedResource, PaginationError,
    fetch_pages,
};
pub use retry::{RetryDecision, RetryPolicy};
pub use variables::{PAGE_LIMIT, Variables};
