use async_trait::async_trait;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::{Context, Handler};

use super::welcome::try_finalize;

pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        if params.len() < 4 {
            return Err(HandlerError::NeedMoreParams);
        }

        let Some(client_arc) = ctx.registry.client_by_id(ctx.id) else {
            return Ok(());
        };

        if client_arc.read().await.registered() {
            return Err(HandlerError::AlreadyRegistered);
        }

        {
            let mut client = client_arc.write().await;
            client.mark_user_set(params[0].clone(), params[3].clone());
            client.touch();
        }

        try_finalize(ctx.registry, ctx.config, ctx.id).await;
        Ok(())
    }
}
