use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::send::send_peer;
use crate::handlers::core::{Context, Handler};

pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let msg = params.first().cloned();
        quit_client(ctx, msg).await;
        Err(HandlerError::Quit(None))
    }
}

/// Broadcast QUIT to every distinct co-channel peer, prune membership, drop
/// now-empty channels, and remove the client from the nick/connection
/// registries. Safe to call more than once for the same client: the second
/// call finds no client in the registry and is a no-op.
pub async fn quit_client(ctx: &Context<'_>, msg: Option<String>) {
    let Some(client_arc) = ctx.registry.client_by_id(ctx.id) else {
        return;
    };

    let (nick, mask, channels) = {
        let client = client_arc.read().await;
        (
            client.nick.clone(),
            client.mask(),
            client.channels.iter().cloned().collect::<Vec<_>>(),
        )
    };

    let reason = msg.unwrap_or_else(|| nick.clone());

    let mut observers = HashSet::new();
    let mut emptied = Vec::new();
    for chan_key in &channels {
        if let Some(channel) = ctx.registry.channel(chan_key) {
            let mut ch = channel.write().await;
            ch.remove_member(&nick);
            for member_id in ch.members.values() {
                observers.insert(*member_id);
            }
            if ch.is_empty() {
                emptied.push(chan_key.clone());
            }
        }
    }
    for chan_key in emptied {
        ctx.registry.remove_channel(&chan_key);
    }

    for observer in observers {
        send_peer(ctx.registry, observer, &mask, "QUIT", &[&reason]).await;
    }

    ctx.registry.remove_client(ctx.id, &nick);
}
