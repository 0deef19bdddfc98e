//! TGP Twingate - client for the Twingate access-control API.
//!
//! This crate provides:
//! - CRUD operations for connectors, remote networks, groups, resources,
//!   service accounts and their keys.
//! - Reads of users, security policies, DLP policies and DNS filtering
//!   profiles, with transparent pagination of every list.
//! - A rate limit on concurrent API calls.
//! - Errors normalized to `failed to <verb> <resource>[ with id|name X]: <cause>`.
//!
//! Requests go through the [`tgp_graphql`] transport, which handles retries,
//! deadlines and cancellation.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;

pub use client::TwingateClient;
pub use config::TwingateConfig;
pub use error::{
    ALL, ApiError, ApiResult, Cause, ConversionError, MutationError, Operation, Precondition,
    ResourceKind, Target, TwingateError, TwingateResult, Verb,
};
pub use logging::{LoggingConfig, init_logging};
pub use tgp_graphql::{RequestContext, RetryPolicy};
