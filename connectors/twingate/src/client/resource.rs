use tgp_graphql::{GraphqlClientError, RequestContext, Variables};

use super::{TwingateClient, allow_empty, nested, nodes, required};
use crate::error::{ApiResult, Operation, Precondition, ResourceKind, Target};
use crate::model::{AccessInput, NameFilter, Resource};
use crate::query::name_filter;
use crate::query::resource::{
    AddResourceAccess, CURSOR_ACCESS, CURSOR_RESOURCES, CreateResource, DeleteResource,
    ReadResource, ReadResourceAccess, ReadResources, ReadResourcesByName, RemoveResourceAccess,
    UpdateResource, UpdateResourceActiveState, apply_access, tags_input,
};

/// Inputs shared by create and update.
fn resource_variables(
    resource: &Resource,
    operation: Operation,
    target: &Target,
) -> ApiResult<Variables> {
    let protocols = serde_json::to_value(&resource.protocols)
        .map_err(|err| operation.error(GraphqlClientError::from(err), target.clone()))?;

    Ok(Variables::new()
        .id_named("remoteNetworkId", &resource.remote_network_id)
        .value("name", resource.name.as_str())
        .value("address", resource.address.as_str())
        .value("protocols", protocols)
        .var("isVisible", resource.is_visible)
        .var("isBrowserShortcutEnabled", resource.is_browser_shortcut_enabled)
        .nullable("alias", resource.alias.clone().unwrap_or_default())
        .nullable(
            "securityPolicyId",
            resource.security_policy_id.clone().unwrap_or_default(),
        )
        .value("tags", tags_input(resource)))
}

impl TwingateClient {
    /// Create a resource. Access grants are managed separately through
    /// [`Self::add_resource_access`], so the returned model carries none.
    pub async fn create_resource(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ApiResult<Resource> {
        let operation = ResourceKind::Resource.create();
        let target = Target::name(&resource.name);
        if resource.remote_network_id.is_empty() {
            return Err(operation.error(Precondition::NetworkIdIsEmpty, target));
        }

        let variables = resource_variables(resource, operation, &target)?;
        let response: CreateResource = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.resource_create.entity, operation, target).map(Resource::from)
    }

    /// Read a resource with its complete access list.
    pub async fn read_resource(&self, ctx: &RequestContext, id: &str) -> ApiResult<Resource> {
        let operation = ResourceKind::Resource.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new()
            .id(id)
            .cursor(CURSOR_ACCESS)
            .page_limit(self.page_limit());
        let response: ReadResource = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        let mut node = required(response.resource, operation, target.clone())?;

        let access = ResourceKind::ResourceAccess
            .read()
            .named("readResourceAccessAfter");
        self.fetch_remaining(
            &nested(ctx, operation),
            &mut node.access,
            &variables,
            CURSOR_ACCESS,
            access,
            &target,
            |page: ReadResourceAccess| page.resource.map(|node| node.access).unwrap_or_default(),
        )
        .await?;

        let edges = node.access.edges;
        let mut resource = Resource::from(node.node);
        apply_access(&mut resource, edges).map_err(|err| operation.error(err, target))?;
        Ok(resource)
    }

    /// Every resource, without access lists; none yields an empty list.
    pub async fn read_resources(&self, ctx: &RequestContext) -> ApiResult<Vec<Resource>> {
        let operation = ResourceKind::Resource.read().named("readResources");
        let target = Target::all();
        let variables = Variables::new()
            .cursor(CURSOR_RESOURCES)
            .page_limit(self.page_limit());

        let Some(mut response) = allow_empty(
            self.query::<ReadResources>(ctx, &variables, operation, target.clone())
                .await,
        )?
        else {
            return Ok(Vec::new());
        };

        self.fetch_remaining(
            ctx,
            &mut response.resources,
            &variables,
            CURSOR_RESOURCES,
            operation,
            &target,
            |page: ReadResources| page.resources,
        )
        .await?;

        Ok(nodes(response.resources))
    }

    /// Update a resource's own fields; access grants are left untouched.
    pub async fn update_resource(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ApiResult<Resource> {
        let operation = ResourceKind::Resource.update();
        let target = Target::id(&resource.id);
        if resource.id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = resource_variables(resource, operation, &target)?.id(&resource.id);
        let response: UpdateResource = self
            .mutate(ctx, &variables, operation, target.clone())
            .await?;
        required(response.resource_update.entity, operation, target).map(Resource::from)
    }

    /// Resources whose name matches `name` under `filter`, without access
    /// lists. No match is an error.
    pub async fn read_resources_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
        filter: NameFilter,
    ) -> ApiResult<Vec<Resource>> {
        let operation = ResourceKind::Resource.read().named("readResourcesByName");
        let target = Target::all();
        let variables = Variables::new()
            .value("filter", name_filter(Some(name), filter))
            .cursor(CURSOR_RESOURCES)
            .page_limit(self.page_limit());

        let mut response: ReadResourcesByName = self
            .query(ctx, &variables, operation, target.clone())
            .await?;
        self.fetch_remaining(
            ctx,
            &mut response.resources,
            &variables,
            CURSOR_RESOURCES,
            operation,
            &target,
            |page: ReadResourcesByName| page.resources,
        )
        .await?;

        Ok(nodes(response.resources))
    }

    /// Activate or deactivate a resource without touching anything else.
    pub async fn update_resource_active_state(
        &self,
        ctx: &RequestContext,
        id: &str,
        is_active: bool,
    ) -> ApiResult<()> {
        let operation = ResourceKind::Resource.update();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new().id(id).value("isActive", is_active);
        let _: UpdateResourceActiveState =
            self.mutate(ctx, &variables, operation, target).await?;
        Ok(())
    }

    /// Grant access to a resource. Nothing is sent for an empty `access`.
    pub async fn add_resource_access(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        access: &[AccessInput],
    ) -> ApiResult<()> {
        let operation = ResourceKind::ResourceAccess.update();
        let target = Target::id(resource_id);
        if access.is_empty() {
            return Ok(());
        }
        if resource_id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let access = serde_json::to_value(access)
            .map_err(|err| operation.error(GraphqlClientError::from(err), target.clone()))?;
        let variables = Variables::new().id(resource_id).value("access", access);
        let _: AddResourceAccess = self.mutate(ctx, &variables, operation, target).await?;
        Ok(())
    }

    /// Revoke the access of groups or service accounts to a resource.
    /// Nothing is sent for an empty `principal_ids`.
    pub async fn remove_resource_access(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        principal_ids: &[String],
    ) -> ApiResult<()> {
        let operation = ResourceKind::ResourceAccess.delete();
        let target = Target::id(resource_id);
        if principal_ids.is_empty() {
            return Ok(());
        }
        if resource_id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let variables = Variables::new()
            .id(resource_id)
            .ids("principalIds", principal_ids);
        let _: RemoveResourceAccess = self.mutate(ctx, &variables, operation, target).await?;
        Ok(())
    }

    pub async fn delete_resource(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        let operation = ResourceKind::Resource.delete();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let _: DeleteResource = self
            .mutate(ctx, &Variables::new().id(id), operation, target)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccessGroup, POLICY_RESTRICTED, PortRange};

    #[test]
    fn variables_send_null_for_unset_optionals() {
        let resource = Resource {
            remote_network_id: "N1".into(),
            name: "db".into(),
            address: "db.internal".into(),
            ..Resource::default()
        };
        let operation = ResourceKind::Resource.create();
        let variables = resource_variables(&resource, operation, &Target::None).expect("variables");

        assert_eq!(variables.get("alias"), Some(&serde_json::Value::Null));
        assert_eq!(variables.get("securityPolicyId"), Some(&serde_json::Value::Null));
        assert!(variables.get("isVisible").is_none());
        assert_eq!(variables.get("tags"), Some(&serde_json::json!([])));
    }

    #[test]
    fn variables_carry_protocols_and_tags() {
        let mut resource = Resource {
            remote_network_id: "N1".into(),
            name: "db".into(),
            address: "db.internal".into(),
            alias: Some("db.example".into()),
            groups_access: vec![AccessGroup::default()],
            ..Resource::default()
        };
        resource.protocols.tcp.policy = POLICY_RESTRICTED.into();
        resource.protocols.tcp.ports = vec![PortRange { start: 5432, end: 5432 }];
        resource.tags.insert("env".into(), "prod".into());

        let operation = ResourceKind::Resource.update();
        let variables = resource_variables(&resource, operation, &Target::None).expect("variables");

        assert_eq!(
            variables.get("protocols").and_then(|value| value.pointer("/tcp/ports/0/start")),
            Some(&serde_json::json!(5432))
        );
        assert_eq!(
            variables.get("tags"),
            Some(&serde_json::json!([{"key": "env", "value": "prod"}]))
        );
        assert_eq!(variables.get("alias"), Some(&serde_json::json!("db.example")));
    }
}
