//! Domain models returned by entity operations.

mod connector;
mod dlp_policy;
mod dns_filtering_profile;
mod filter;
mod group;
mod remote_network;
mod resource;
mod security_policy;
mod service_account;
mod user;

pub use connector::{Connector, ConnectorTokens};
pub use dlp_policy::DlpPolicy;
pub use dns_filtering_profile::{
    ContentCategories, DnsFilteringProfile, FALLBACK_METHOD_AUTO, FALLBACK_METHOD_STRICT,
    PrivacyCategories, SecurityCategories,
};
pub use filter::{GroupsFilter, NameFilter};
pub use group::{GROUP_TYPE_MANUAL, GROUP_TYPE_SYNCED, GROUP_TYPE_SYSTEM, Group};
pub use remote_network::{
    LOCATION_AWS, LOCATION_AZURE, LOCATION_GOOGLE_CLOUD, LOCATION_ON_PREMISE, LOCATION_OTHER,
    LOCATIONS, RemoteNetwork,
};
pub use resource::{
    AccessGroup, AccessInput, POLICY_ALLOW_ALL, POLICY_DENY_ALL, POLICY_RESTRICTED, PortRange,
    Protocol, Protocols, Resource,
};
pub use security_policy::SecurityPolicy;
pub use service_account::{
    KEY_STATUS_ACTIVE, KEY_STATUS_REVOKED, ServiceAccount, ServiceAccountKey,
    ServiceAccountUpdate,
};
pub use user::{ROLE_ADMIN, ROLE_DEVOPS, ROLE_MEMBER, ROLE_SUPPORT, User};
