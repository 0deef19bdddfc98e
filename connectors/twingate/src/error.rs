//! Twingate error types.
//!
//! Every entity operation fails with an [`ApiError`]: a single message of the
//! form `failed to <verb> <resource>[ with id X | with name Y]: <cause>`, with
//! the underlying cause kept reachable through [`std::error::Error::source`].

use std::fmt;

use tgp_graphql::{GraphqlClientError, PaginationError};
use thiserror::Error;

/// Target id used when an operation concerns a whole collection.
pub const ALL: &str = "All";

/// Operation verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Create an entity.
    Create,
    /// Read one entity or a collection.
    Read,
    /// Update an existing entity.
    Update,
    /// Delete an entity.
    Delete,
    /// Revoke a service account key.
    Revoke,
    /// Generate connector tokens.
    Generate,
    /// Verify connector tokens.
    Verify,
}

impl Verb {
    /// Lowercase verb as it appears in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Revoke => "revoke",
            Self::Generate => "generate",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity an operation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Connector deployed in a remote network.
    Connector,
    /// Access/refresh token pair of a connector.
    ConnectorTokens,
    /// User group.
    Group,
    /// Remote network.
    RemoteNetwork,
    /// Network resource.
    Resource,
    /// Group and service account grants on a resource.
    ResourceAccess,
    /// Security policy.
    SecurityPolicy,
    /// Data loss prevention policy.
    DlpPolicy,
    /// Service account.
    ServiceAccount,
    /// Key of a service account.
    ServiceAccountKey,
    /// User.
    User,
    /// DNS filtering profile.
    DnsFilteringProfile,
}

impl ResourceKind {
    /// Human-readable name used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connector => "connector",
            Self::ConnectorTokens => "connector tokens",
            Self::Group => "group",
            Self::RemoteNetwork => "remote network",
            Self::Resource => "resource",
            Self::ResourceAccess => "resource access",
            Self::SecurityPolicy => "security policy",
            Self::DlpPolicy => "dlp policy",
            Self::ServiceAccount => "service account",
            Self::ServiceAccountKey => "service account key",
            Self::User => "user",
            Self::DnsFilteringProfile => "DNS filtering profile",
        }
    }

    /// Identifier-friendly name, e.g. `RemoteNetwork`.
    const fn ident(self) -> &'static str {
        match self {
            Self::Connector => "Connector",
            Self::ConnectorTokens => "ConnectorTokens",
            Self::Group => "Group",
            Self::RemoteNetwork => "RemoteNetwork",
            Self::Resource => "Resource",
            Self::ResourceAccess => "ResourceAccess",
            Self::SecurityPolicy => "SecurityPolicy",
            Self::DlpPolicy => "DLPPolicy",
            Self::ServiceAccount => "ServiceAccount",
            Self::ServiceAccountKey => "ServiceAccountKey",
            Self::User => "User",
            Self::DnsFilteringProfile => "DNSFilteringProfile",
        }
    }

    /// `create` applied to this kind.
    pub const fn create(self) -> Operation {
        Operation::new(Verb::Create, self)
    }

    /// `read` applied to this kind.
    pub const fn read(self) -> Operation {
        Operation::new(Verb::Read, self)
    }

    /// `update` applied to this kind.
    pub const fn update(self) -> Operation {
        Operation::new(Verb::Update, self)
    }

    /// `delete` applied to this kind.
    pub const fn delete(self) -> Operation {
        Operation::new(Verb::Delete, self)
    }

    /// `revoke` applied to this kind.
    pub const fn revoke(self) -> Operation {
        Operation::new(Verb::Revoke, self)
    }

    /// `generate` applied to this kind.
    pub const fn generate(self) -> Operation {
        Operation::new(Verb::Generate, self)
    }

    /// `verify` applied to this kind.
    pub const fn verify(self) -> Operation {
        Operation::new(Verb::Verify, self)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation verb applied to a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    /// What is done.
    pub verb: Verb,
    /// What it is done to.
    pub resource: ResourceKind,
    name: Option<&'static str>,
}

impl Operation {
    /// Operation whose name is derived from `verb` and `resource`.
    pub const fn new(verb: Verb, resource: ResourceKind) -> Self {
        Self {
            verb,
            resource,
            name: None,
        }
    }

    /// Override the derived operation name.
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Operation name: `readConnector`, `createRemoteNetwork`, or the override.
    pub fn name(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => format!("{}{}", self.verb.as_str(), self.resource.ident()),
        }
    }

    /// Normalize `cause` for this operation.
    ///
    /// A cause that already is an [`ApiError`] is returned unchanged.
    pub fn error(self, cause: impl Into<Cause>, target: Target) -> ApiError {
        match cause.into() {
            Cause::Api(err) => *err,
            cause => ApiError::new(self, target, cause),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.resource)
    }
}

/// Which entity an error concerns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Target {
    /// No identifying detail is known.
    #[default]
    None,
    /// Rendered as ` with id <id>`.
    Id(String),
    /// Rendered as ` with name <name>`.
    Name(String),
}

impl Target {
    /// Target by id; an empty id means no target.
    pub fn id(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.is_empty() { Self::None } else { Self::Id(id) }
    }

    /// Target by name; an empty name means no target.
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::None
        } else {
            Self::Name(name)
        }
    }

    /// Name when present, otherwise id.
    pub fn id_or_name(id: &str, name: &str) -> Self {
        match Self::name(name) {
            Self::None => Self::id(id),
            target => target,
        }
    }

    /// The whole collection.
    pub fn all() -> Self {
        Self::Id(ALL.to_string())
    }
}

/// A required input was missing; raised before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    /// Entity id missing.
    #[error("id is empty")]
    IdIsEmpty,
    /// Entity name missing.
    #[error("name is empty")]
    NameIsEmpty,
    /// Lookup needs either an id or a name.
    #[error("both name and id should not be empty")]
    NameAndIdAreEmpty,
    /// Connector id missing on update or token generation.
    #[error("connector id is empty")]
    ConnectorIdIsEmpty,
    /// Remote network id missing.
    #[error("network id is empty")]
    NetworkIdIsEmpty,
    /// Remote network name missing.
    #[error("network name is empty")]
    NetworkNameIsEmpty,
    /// User email missing.
    #[error("email is empty")]
    EmailIsEmpty,
}

/// The server returned `ok: false` for a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MutationError {
    /// Server-provided `error` text, verbatim.
    pub message: String,
}

impl MutationError {
    /// Rejection carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A response could not be converted to a domain model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

/// What went wrong underneath an [`ApiError`].
#[derive(Debug, Clone, Error)]
pub enum Cause {
    /// HTTP, decoding, GraphQL or context failure.
    #[error(transparent)]
    Transport(#[from] GraphqlClientError),
    /// Mutation answered with `ok: false`.
    #[error(transparent)]
    Rejected(#[from] MutationError),
    /// The server returned no entity.
    #[error("query result is empty")]
    EmptyResult,
    /// A required input was missing.
    #[error(transparent)]
    Precondition(#[from] Precondition),
    /// A follow-up page could not be requested.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    /// A response could not be turned into a model.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Already normalized by a nested operation.
    #[error(transparent)]
    Api(Box<ApiError>),
}

impl From<ApiError> for Cause {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

/// Render the normalized message for a failed operation.
pub fn format_error(
    verb: Verb,
    resource: ResourceKind,
    target: &Target,
    cause: &dyn fmt::Display,
) -> String {
    let mut message = format!("failed to {verb} {resource}");
    match target {
        Target::None => {}
        Target::Id(id) => message.push_str(&format!(" with id {id}")),
        Target::Name(name) => message.push_str(&format!(" with name {name}")),
    }
    message.push_str(&format!(": {cause}"));
    message
}

/// Normalized entity operation error.
#[derive(Debug, Clone)]
pub struct ApiError {
    operation: Operation,
    target: Target,
    cause: Cause,
    message: String,
}

impl ApiError {
    fn new(operation: Operation, target: Target, cause: Cause) -> Self {
        let message = format_error(operation.verb, operation.resource, &target, &cause);
        Self {
            operation,
            target,
            cause,
            message,
        }
    }

    /// Verb of the failed operation.
    pub const fn verb(&self) -> Verb {
        self.operation.verb
    }

    /// Resource kind of the failed operation.
    pub const fn resource(&self) -> ResourceKind {
        self.operation.resource
    }

    /// Entity the error concerns.
    pub const fn target(&self) -> &Target {
        &self.target
    }

    /// Underlying cause.
    pub const fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The read returned no entity.
    pub const fn is_empty_result(&self) -> bool {
        matches!(self.cause, Cause::EmptyResult)
    }

    /// The server rejected a mutation with `ok: false`.
    pub const fn is_business_rejection(&self) -> bool {
        matches!(self.cause, Cause::Rejected(_))
    }

    /// A required input was missing.
    pub const fn is_precondition(&self) -> bool {
        matches!(self.cause, Cause::Precondition(_))
    }

    /// Transport error underneath, if any.
    pub const fn transport(&self) -> Option<&GraphqlClientError> {
        match &self.cause {
            Cause::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::Transport(err) => Some(err),
            Cause::Rejected(err) => Some(err),
            Cause::Precondition(err) => Some(err),
            Cause::Pagination(err) => Some(err),
            Cause::Conversion(err) => Some(err),
            Cause::Api(err) => Some(err.as_ref()),
            Cause::EmptyResult => Some(&self.cause),
        }
    }
}

/// Client setup errors.
#[derive(Error, Debug)]
pub enum TwingateError {
    /// No API token was configured.
    #[error("api token not set")]
    ApiTokenNotSet,

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The transport could not be built.
    #[error(transparent)]
    Graphql(#[from] GraphqlClientError),
}

/// Result of client setup.
pub type TwingateResult<T> = Result<T, TwingateError>;

/// Result of an entity operation.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use tgp_graphql::{GraphqlError, HttpErrorInfo};

    use super::*;

    fn graphql_errors(messages: &[&str]) -> GraphqlClientError {
        let errors = messages
            .iter()
            .map(|message| {
                serde_json::from_value::<GraphqlError>(serde_json::json!({"message": message}))
                    .expect("graphql error")
            })
            .collect();
        GraphqlClientError::GraphqlErrors { errors }
    }

    #[test]
    fn message_without_target() {
        let err = ResourceKind::ServiceAccountKey
            .create()
            .error(Precondition::IdIsEmpty, Target::None);
        assert_eq!(
            err.to_string(),
            "failed to create service account key: id is empty"
        );
        assert!(err.is_precondition());
    }

    #[test]
    fn message_with_id() {
        let err = ResourceKind::Group
            .read()
            .error(Cause::EmptyResult, Target::id("g1"));
        assert_eq!(
            err.to_string(),
            "failed to read group with id g1: query result is empty"
        );
        assert!(err.is_empty_result());
    }

    #[test]
    fn message_with_name() {
        let err = ResourceKind::Connector
            .create()
            .error(MutationError::new("name already taken"), Target::name("c1"));
        assert_eq!(
            err.to_string(),
            "failed to create connector with name c1: name already taken"
        );
        assert!(err.is_business_rejection());
    }

    #[test]
    fn collection_target_uses_sentinel() {
        let err = ResourceKind::Connector
            .read()
            .error(Cause::EmptyResult, Target::all());
        assert_eq!(
            err.to_string(),
            "failed to read connector with id All: query result is empty"
        );
    }

    #[test]
    fn name_takes_precedence_over_id() {
        assert_eq!(Target::id_or_name("n1", "alpha"), Target::name("alpha"));
        assert_eq!(Target::id_or_name("n1", ""), Target::id("n1"));
        assert_eq!(Target::id_or_name("", ""), Target::None);
    }

    #[test]
    fn graphql_errors_are_joined() {
        let err = ResourceKind::RemoteNetwork
            .update()
            .error(graphql_errors(&["first", "second"]), Target::id("n1"));
        assert_eq!(
            err.to_string(),
            "failed to update remote network with id n1: first; second"
        );
    }

    #[test]
    fn existing_error_is_not_wrapped_again() {
        let inner = ResourceKind::ResourceAccess
            .read()
            .error(Cause::EmptyResult, Target::id("r1"));
        let outer = ResourceKind::Resource.read().error(inner.clone(), Target::id("r1"));
        assert_eq!(outer.to_string(), inner.to_string());
        assert_eq!(outer.resource(), ResourceKind::ResourceAccess);
    }

    #[test]
    fn transport_error_is_reachable_through_source() {
        let transport = GraphqlClientError::Http(HttpErrorInfo {
            message: "connection refused".to_string(),
            status_code: None,
            is_timeout: false,
            is_connect: true,
            is_request: false,
        });
        let err = ResourceKind::User.read().error(transport, Target::id("u1"));

        let source = err.source().expect("source");
        let transport = source
            .downcast_ref::<GraphqlClientError>()
            .expect("transport error");
        assert!(transport.is_retryable());
        assert!(err.transport().is_some());
        assert_eq!(
            err.to_string(),
            "failed to read user with id u1: can't execute http request: connection refused"
        );
    }

    #[test]
    fn operation_names() {
        assert_eq!(ResourceKind::Connector.read().name(), "readConnector");
        assert_eq!(
            ResourceKind::RemoteNetwork.create().name(),
            "createRemoteNetwork"
        );
        assert_eq!(
            ResourceKind::ResourceAccess
                .read()
                .named("readResourceAccessAfter")
                .name(),
            "readResourceAccessAfter"
        );
    }
}
