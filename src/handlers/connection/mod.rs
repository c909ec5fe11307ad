//! NICK/USER registration and connection-lifecycle commands.

mod nick;
pub mod quit;
mod user;
pub mod welcome;

pub use nick::NickHandler;
pub use quit::QuitHandler;
pub use user::UserHandler;

use async_trait::async_trait;

use crate::error::HandlerResult;
use crate::handlers::core::{Context, Handler};

pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let token = params.first().map(String::as_str).unwrap_or("");
        if let Some(client) = ctx.registry.client_by_id(ctx.id) {
            let line = format!(
                ":{0} PONG {0} :{1}",
                ctx.config.server_name, token
            );
            let _ = client.read().await.send_line(line);
        }
        Ok(())
    }
}

pub struct PongHandler;

#[async_trait]
impl Handler for PongHandler {
    async fn handle(&self, _ctx: &Context<'_>, _params: &[String]) -> HandlerResult {
        Ok(())
    }
}

/// Stub `CAP` support: `LS` returns an empty list, everything else (`END`
/// included) is accepted but ignored. Registration never waits on `CAP END`.
pub struct CapHandler;

#[async_trait]
impl Handler for CapHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let sub = params.first().map(|s| s.to_ascii_uppercase());
        if sub.as_deref() == Some("LS") {
            if let Some(client) = ctx.registry.client_by_id(ctx.id) {
                let nick = client.read().await.nick.clone();
                let line = format!(":{} CAP {} LS :", ctx.config.server_name, nick);
                let _ = client.read().await.send_line(line);
            }
        }
        Ok(())
    }
}

