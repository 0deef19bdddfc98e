pub const KEY_STATUS_ACTIVE: &str = "ACTIVE";
pub const KEY_STATUS_REVOKED: &str = "REVOKED";

/// A non-human identity that holds API keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAccount {
    pub id: String,
    pub name: String,
    /// Ids of active resources the account can reach.
    pub resources: Vec<String>,
    /// Ids of active keys.
    pub keys: Vec<String>,
}

/// Changes applied by an update; empty fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAccountUpdate {
    pub id: String,
    pub name: Option<String>,
    pub added_resource_ids: Vec<String>,
    pub removed_resource_ids: Vec<String>,
}

/// A key issued to a service account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAccountKey {
    pub id: String,
    pub name: String,
    pub service_account_id: String,
    /// Days until expiry; 0 means the key never expires.
    pub expiration_time: i64,
    pub status: String,
    /// Secret token, only returned when the key is created.
    pub token: Option<String>,
}

impl ServiceAccountKey {
    pub fn is_active(&self) -> bool {
        self.status == KEY_STATUS_ACTIVE
    }
}
