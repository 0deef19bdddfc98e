use tgp_graphql::{RequestContext, Variables};

use super::{TwingateClient, nested, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::DnsFilteringProfile;
use crate::query::dns_filtering_profile::{
    CURSOR_GROUPS, ReadDnsFilteringProfile, ReadDnsFilteringProfileGroups,
};

impl TwingateClient {
    /// Read a DNS filtering profile with every group it applies to.
    pub async fn read_dns_filtering_profile(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> ApiResult<DnsFilteringProfile> {
        let operation = ResourceKind::DnsFilteringProfile.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new()
            .id(id)
            .cursor(CURSOR_GROUPS)
            .page_limit(self.page_limit());
        let response: ReadDnsFilteringProfile = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        let mut node = required(response.dns_filtering_profile, operation, target.clone())?;

        self.fetch_remaining(
            &nested(ctx, operation),
            &mut node.groups,
            &variables,
            CURSOR_GROUPS,
            operation.named("readDNSFilteringProfileGroups"),
            &target,
            |page: ReadDnsFilteringProfileGroups| {
                page.dns_filtering_profile
                    .map(|node| node.groups)
                    .unwrap_or_default()
            },
        )
        .await?;

        Ok(DnsFilteringProfile::from(node))
    }
}
