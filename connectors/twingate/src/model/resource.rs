use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const POLICY_RESTRICTED: &str = "RESTRICTED";
pub const POLICY_ALLOW_ALL: &str = "ALLOW_ALL";
pub const POLICY_DENY_ALL: &str = "DENY_ALL";

/// A network destination protected by Twingate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub remote_network_id: String,
    pub address: String,
    pub name: String,
    pub protocols: Protocols,
    pub is_active: bool,
    pub groups_access: Vec<AccessGroup>,
    pub service_accounts: Vec<String>,
    pub is_visible: Option<bool>,
    pub is_browser_shortcut_enabled: Option<bool>,
    pub alias: Option<String>,
    pub security_policy_id: Option<String>,
    pub tags: BTreeMap<String, String>,
}

/// A group granted access to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessGroup {
    pub group_id: String,
    pub security_policy_id: Option<String>,
}

/// Grant added to a resource: a group or service account, optionally under
/// its own security policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessInput {
    pub principal_id: String,
    pub security_policy_id: Option<String>,
}

impl From<&AccessGroup> for AccessInput {
    fn from(access: &AccessGroup) -> Self {
        Self {
            principal_id: access.group_id.clone(),
            security_policy_id: access.security_policy_id.clone(),
        }
    }
}

/// Protocol restrictions of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocols {
    #[serde(default)]
    pub allow_icmp: bool,
    #[serde(default)]
    pub tcp: Protocol,
    #[serde(default)]
    pub udp: Protocol,
}

impl Default for Protocols {
    fn default() -> Self {
        Self {
            allow_icmp: true,
            tcp: Protocol::default(),
            udp: Protocol::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    #[serde(default)]
    pub policy: String,
    #[serde(default)]
    pub ports: Vec<PortRange>,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            policy: POLICY_ALLOW_ALL.to_string(),
            ports: Vec::new(),
        }
    }
}

/// Inclusive port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}
