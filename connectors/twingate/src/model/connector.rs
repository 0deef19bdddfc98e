use std::fmt;

/// A connector deployed in a remote network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connector {
    pub id: String,
    pub name: String,
    pub network_id: String,
    pub status_updates_enabled: bool,
}

/// Access and refresh tokens issued to a connector.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectorTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for ConnectorTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
