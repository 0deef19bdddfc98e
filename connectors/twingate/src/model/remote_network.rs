pub const LOCATION_AWS: &str = "AWS";
pub const LOCATION_AZURE: &str = "AZURE";
pub const LOCATION_GOOGLE_CLOUD: &str = "GOOGLE_CLOUD";
pub const LOCATION_ON_PREMISE: &str = "ON_PREMISE";
pub const LOCATION_OTHER: &str = "OTHER";

/// Every location a remote network can report.
pub const LOCATIONS: [&str; 5] = [
    LOCATION_AWS,
    LOCATION_AZURE,
    LOCATION_GOOGLE_CLOUD,
    LOCATION_ON_PREMISE,
    LOCATION_OTHER,
];

/// A remote network: the private network connectors give access to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNetwork {
    pub id: String,
    pub name: String,
    pub location: String,
}

impl Default for RemoteNetwork {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            location: LOCATION_OTHER.to_string(),
        }
    }
}
