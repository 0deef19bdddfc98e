use serde_json::Value;
use tgp_graphql::{RequestContext, Variables};

use super::{TwingateClient, allow_empty, nodes, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::{Group, GroupsFilter, NameFilter};
use crate::query::group::{
    CURSOR_GROUPS, CreateGroup, DeleteGroup, ReadGroup, ReadGroups, ReadGroupsByName,
    UpdateGroup, group_filter_input,
};

impl TwingateClient {
    pub async fn create_group(&self, ctx: &RequestContext, group: &Group) -> ApiResult<Group> {
        let operation = ResourceKind::Group.create();
        let target = Target::name(&group.name);
        if group.name.is_empty() {
            return Err(operation.error(Precondition::NameIsEmpty, target));
        }

        let variables = Variables::new()
            .value("name", group.name.as_str())
            .var("securityPolicyId", group.security_policy_id.clone());

        let response: CreateGroup = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.group_create.entity, operation, target).map(Group::from)
    }

    pub async fn read_group(&self, ctx: &RequestContext, id: &str) -> ApiResult<Group> {
        let operation = ResourceKind::Group.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let response: ReadGroup = self
            .query(ctx, &Variables::new().id(id), operation, target.clone())
            .await?;
        required(response.group, operation, target).map(Group::from)
    }

    /// Groups matching the server-side `filter`; no match is an error.
    pub async fn read_groups(
        &self,
        ctx: &RequestContext,
        filter: Option<&GroupsFilter>,
    ) -> ApiResult<Vec<Group>> {
        let operation = ResourceKind::Group.read().named("readGroups");
        let target = Target::all();
        let variables = Variables::new()
            .value("filter", filter.map_or(Value::Null, group_filter_input))
            .cursor(CURSOR_GROUPS)
            .page_limit(self.page_limit());

        let mut response: ReadGroups = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        self.fetch_remaining(
            ctx,
            &mut response.groups,
            &variables,
            CURSOR_GROUPS,
            operation,
            &target,
            |page: ReadGroups| page.groups,
        )
        .await?;

        Ok(nodes(response.groups))
    }

    /// Groups named exactly `name`; no match is an error.
    pub async fn read_groups_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> ApiResult<Vec<Group>> {
        let operation = ResourceKind::Group.read().named("readGroups");
        let target = Target::name(name);
        if name.is_empty() {
            return Err(operation.error(Precondition::NameIsEmpty, target));
        }

        let variables = Variables::new()
            .value("name", name)
            .cursor(CURSOR_GROUPS)
            .page_limit(self.page_limit());

        let mut response: ReadGroupsByName = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        self.fetch_remaining(
            ctx,
            &mut response.groups,
            &variables,
            CURSOR_GROUPS,
            operation,
            &target,
            |page: ReadGroupsByName| page.groups,
        )
        .await?;

        Ok(nodes(response.groups))
    }

    /// Groups matching every criterion of `filter`.
    ///
    /// An exact name goes through the by-name query; any other filter is
    /// sent to the server as is. Type and activity are checked again locally.
    /// No match yields an empty list.
    pub async fn filter_groups(
        &self,
        ctx: &RequestContext,
        filter: &GroupsFilter,
    ) -> ApiResult<Vec<Group>> {
        let groups = match filter.name.as_deref() {
            Some(name) if filter.has_name() && filter.name_filter == NameFilter::Exact => {
                allow_empty(self.read_groups_by_name(ctx, name).await)?
            }
            _ => allow_empty(self.read_groups(ctx, Some(filter)).await)?,
        };

        Ok(groups
            .unwrap_or_default()
            .into_iter()
            .filter(|group| filter.matches(group))
            .collect())
    }

    pub async fn update_group(&self, ctx: &RequestContext, group: &Group) -> ApiResult<Group> {
        let operation = ResourceKind::Group.update();
        let target = Target::id(&group.id);
        if group.id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }
        if group.name.is_empty() {
            return Err(operation.error(Precondition::NameIsEmpty, target));
        }

        let variables = Variables::new()
            .id(&group.id)
            .value("name", group.name.as_str())
            .var("securityPolicyId", group.security_policy_id.clone());

        let response: UpdateGroup = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.group_update.entity, operation, target).map(Group::from)
    }

    pub async fn delete_group(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let operation = ResourceKind::Group.delete();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let _: DeleteGroup = self
            .mutate(ctx, &Variables::new().id(id), operation, target)
            .await?;
        Ok(())
    }
}
