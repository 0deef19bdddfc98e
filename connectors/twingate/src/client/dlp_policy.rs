use tgp_graphql::{RequestContext, Variables};

use super::{TwingateClient, allow_empty, nodes, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::{DlpPolicy, NameFilter};
use crate::query::dlp_policy::{CURSOR_DLP_POLICIES, ReadDlpPolicies, ReadDlpPolicy};
use crate::query::name_filter;

impl TwingateClient {
    pub async fn read_dlp_policy(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
    ) -> ApiResult<DlpPolicy> {
        let operation = ResourceKind::DlpPolicy.read();
        let target = Target::id_or_name(id, name);
        if id.is_empty() && name.is_empty() {
            return Err(operation.error(Precondition::NameAndIdAreEmpty, target));
        }

        let variables = Variables::new()
            .nullable("id", id.to_string())
            .nullable("name", name.to_string());
        let response: ReadDlpPolicy = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        required(response.dlp_policy, operation, target).map(DlpPolicy::from)
    }

    pub async fn read_dlp_policies(
        &self,
        ctx: &RequestContext,
        name: Option<&str>,
        filter: NameFilter,
    ) -> ApiResult<Vec<DlpPolicy>> {
        let operation = ResourceKind::DlpPolicy.read().named("readDLPPolicies");
        let target = Target::all();
        let variables = Variables::new()
            .value("filter", name_filter(name, filter))
            .cursor(CURSOR_DLP_POLICIES)
            .page_limit(self.page_limit());

        let Some(mut response) = allow_empty(
            self.query::<ReadDlpPolicies>(ctx, &variables, operation, target.clone())
                .await,
        )?
        else {
            return Ok(Vec::new());
        };

        self.fetch_remaining(
            ctx,
            &mut response.dlp_policies,
            &variables,
            CURSOR_DLP_POLICIES,
            operation,
            &target,
            |page: ReadDlpPolicies| page.dlp_policies,
        )
        .await?;

        Ok(nodes(response.dlp_policies))
    }
}
