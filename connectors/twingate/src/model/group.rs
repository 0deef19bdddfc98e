pub const GROUP_TYPE_MANUAL: &str = "MANUAL";
pub const GROUP_TYPE_SYNCED: &str = "SYNCED";
pub const GROUP_TYPE_SYSTEM: &str = "SYSTEM";

/// A group of users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub group_type: String,
    pub is_active: bool,
    pub is_authoritative: bool,
    pub security_policy_id: Option<String>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            group_type: GROUP_TYPE_MANUAL.to_string(),
            is_active: true,
            is_authoritative: false,
            security_policy_id: None,
        }
    }
}
