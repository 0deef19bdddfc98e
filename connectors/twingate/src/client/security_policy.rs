use tgp_graphql::{RequestContext, Variables};

use super::{TwingateClient, allow_empty, nodes, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::{NameFilter, SecurityPolicy};
use crate::query::name_filter;
use crate::query::security_policy::{CURSOR_POLICIES, ReadSecurityPolicies, ReadSecurityPolicy};

impl TwingateClient {
    /// Read a policy by id or by name; at least one must be given.
    pub async fn read_security_policy(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
    ) -> ApiResult<SecurityPolicy> {
        let operation = ResourceKind::SecurityPolicy.read();
        let target = Target::id_or_name(id, name);
        if id.is_empty() && name.is_empty() {
            return Err(operation.error(Precondition::NameAndIdAreEmpty, target));
        }

        let variables = Variables::new()
            .nullable("id", id.to_string())
            .nullable("name", name.to_string());
        let response: ReadSecurityPolicy = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        required(response.security_policy, operation, target).map(SecurityPolicy::from)
    }

    /// Policies whose name passes `filter`, or every policy without a name.
    pub async fn read_security_policies(
        &self,
        ctx: &RequestContext,
        name: Option<&str>,
        filter: NameFilter,
    ) -> ApiResult<Vec<SecurityPolicy>> {
        let operation = ResourceKind::SecurityPolicy.read().named("readSecurityPolicies");
        let target = Target::all();
        let variables = Variables::new()
            .value("filter", name_filter(name, filter))
            .cursor(CURSOR_POLICIES)
            .page_limit(self.page_limit());

        let Some(mut response) = allow_empty(
            self.query::<ReadSecurityPolicies>(ctx, &variables, operation, target.clone())
                .await,
        )?
        else {
            return Ok(Vec::new());
        };

        self.fetch_remaining(
            ctx,
            &mut response.security_policies,
            &variables,
            CURSOR_POLICIES,
            operation,
            &target,
            |page: ReadSecurityPolicies| page.security_policies,
        )
        .await?;

        Ok(nodes(response.security_policies))
    }
}
