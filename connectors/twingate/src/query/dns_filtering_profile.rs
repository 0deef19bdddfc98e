//! DNS filtering profile documents.

use serde::Deserialize;
use tgp_graphql::{GraphqlOperation, OperationKind, PaginatedResource};

use super::{Edge, IdNode, QueryResponse};
use crate::model::{ContentCategories, DnsFilteringProfile, PrivacyCategories, SecurityCategories};

pub const CURSOR_GROUPS: &str = "groupsEndCursor";

macro_rules! groups_connection {
    () => {
        concat!(
            "groups(after: $groupsEndCursor, first: $pageLimit) { ",
            page_info!(),
            " edges { node { id } } }"
        )
    };
}

pub type GroupIds = PaginatedResource<Edge<IdNode>>;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsFilteringProfileNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: f64,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub denied_domains: Vec<String>,
    #[serde(default)]
    pub fallback_method: String,
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub groups: GroupIds,
    #[serde(default)]
    pub privacy_category_config: Option<PrivacyCategories>,
    #[serde(default)]
    pub security_category_config: Option<SecurityCategories>,
    #[serde(default)]
    pub content_category_config: Option<ContentCategories>,
}

impl From<DnsFilteringProfileNode> for DnsFilteringProfile {
    fn from(node: DnsFilteringProfileNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            priority: node.priority,
            allowed_domains: node.allowed_domains,
            denied_domains: node.denied_domains,
            fallback_method: node.fallback_method,
            groups: node.groups.edges.into_iter().map(|edge| edge.node.id).collect(),
            privacy_categories: node.privacy_category_config,
            security_categories: node.security_category_config,
            content_categories: node.content_category_config,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDnsFilteringProfile {
    pub dns_filtering_profile: Option<DnsFilteringProfileNode>,
}

impl GraphqlOperation for ReadDnsFilteringProfile {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readDNSFilteringProfile";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $groupsEndCursor: String, $pageLimit: Int) { dnsFilteringProfile(id: $id) { ",
        "id name priority allowedDomains deniedDomains fallbackMethod ",
        groups_connection!(),
        " privacyCategoryConfig { blockAffiliate blockDisguisedTrackers blockAdsAndTrackers }",
        " securityCategoryConfig { enableThreatIntelligenceFeeds enableGoogleSafeBrowsing",
        " blockCryptojacking blockIdnHomographs blockTyposquatting blockDnsRebinding",
        " blockNewlyRegisteredDomains blockDomainGenerationAlgorithms blockParkedDomains }",
        " contentCategoryConfig { blockGambling blockDating blockAdultContent blockSocialMedia",
        " blockGames blockStreaming blockPiracy enableYoutubeRestrictedMode enableSafeSearch }",
        " } }"
    );
}

impl QueryResponse for ReadDnsFilteringProfile {
    fn is_empty(&self) -> bool {
        self.dns_filtering_profile.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DnsFilteringProfileGroupsNode {
    #[serde(default, deserialize_with = "crate::query::null_as_default")]
    pub groups: GroupIds,
}

/// Follow-up page of a profile's groups.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDnsFilteringProfileGroups {
    pub dns_filtering_profile: Option<DnsFilteringProfileGroupsNode>,
}

impl GraphqlOperation for ReadDnsFilteringProfileGroups {
    const KIND: OperationKind = OperationKind::Query;
    const OPERATION_NAME: &'static str = "readDNSFilteringProfileGroups";
    const DOCUMENT: &'static str = concat!(
        "($id: ID!, $groupsEndCursor: String, $pageLimit: Int) { dnsFilteringProfile(id: $id) { ",
        groups_connection!(),
        " } }"
    );
}

impl QueryResponse for ReadDnsFilteringProfileGroups {
    fn is_empty(&self) -> bool {
        self.dns_filtering_profile.is_none()
    }
}
