use serde::Deserialize;

pub const FALLBACK_METHOD_AUTO: &str = "AUTO";
pub const FALLBACK_METHOD_STRICT: &str = "STRICT";

/// DNS filtering profile applied to groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnsFilteringProfile {
    pub id: String,
    pub name: String,
    pub priority: f64,
    pub allowed_domains: Vec<String>,
    pub denied_domains: Vec<String>,
    pub fallback_method: String,
    pub groups: Vec<String>,
    pub privacy_categories: Option<PrivacyCategories>,
    pub security_categories: Option<SecurityCategories>,
    pub content_categories: Option<ContentCategories>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PrivacyCategories {
    pub block_affiliate: bool,
    pub block_disguised_trackers: bool,
    pub block_ads_and_trackers: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SecurityCategories {
    pub enable_threat_intelligence_feeds: bool,
    pub enable_google_safe_browsing: bool,
    pub block_cryptojacking: bool,
    pub block_idn_homographs: bool,
    pub block_typosquatting: bool,
    pub block_dns_rebinding: bool,
    pub block_newly_registered_domains: bool,
    pub block_domain_generation_algorithms: bool,
    pub block_parked_domains: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ContentCategories {
    pub block_gambling: bool,
    pub block_dating: bool,
    pub block_adult_content: bool,
    pub block_social_media: bool,
    pub block_games: bool,
    pub block_streaming: bool,
    pub block_piracy: bool,
    pub enable_youtube_restricted_mode: bool,
    pub enable_safe_search: bool,
}
