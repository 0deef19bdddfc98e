use tgp_graphql::{RequestContext, Variables};

use super::{TwingateClient, allow_empty, nodes, required};
use crate::error::{ApiResult, Precondition, ResourceKind, Target};
use crate::model::User;
use crate::query::user::{CURSOR_USERS, ReadUser, ReadUsers};

impl TwingateClient {
    pub async fn read_user(&self, ctx: &RequestContext, id: &str) -> ApiResult<User> {
        let operation = ResourceKind::User.read();
        let target = Target::id(id);
        if id.is_empty() {
            return Err(operation.error(Precondition::IdIsEmpty, target));
        }

        let response: ReadUser = self
            .query(ctx, &Variables::new().id(id), operation, target.clone())
            .await?;
        required(response.user, operation, target).map(User::from)
    }

    /// Every user of the account, or an empty list.
    pub async fn read_users(&self, ctx: &RequestContext) -> ApiResult<Vec<User>> {
        let operation = ResourceKind::User.read().named("readUsers");
        let target = Target::all();
        let variables = Variables::new()
            .cursor(CURSOR_USERS)
            .page_limit(self.page_limit());

        let Some(mut response) = allow_empty(
            self.query::<ReadUsers>(ctx, &variables, operation, target.clone())
                .await,
        )?
        else {
            return Ok(Vec::new());
        };

        self.fetch_remaining(
            ctx,
            &mut response.users,
            &variables,
            CURSOR_USERS,
            operation,
            &target,
            |page: ReadUsers| page.users,
        )
        .await?;

        Ok(nodes(response.users))
    }
}
