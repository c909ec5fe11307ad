use async_trait::async_trait;
use irc_proto::{irc_to_lower, valid_nick};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::send::send_peer;
use crate::handlers::core::{Context, Handler};

use super::welcome::try_finalize;

pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let Some(new_nick) = params.first() else {
            return Err(HandlerError::NeedMoreParams);
        };
        if new_nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }
        if !valid_nick(new_nick) {
            return Err(HandlerError::ErroneousNickname(new_nick.clone()));
        }

        let Some(client_arc) = ctx.registry.client_by_id(ctx.id) else {
            return Ok(());
        };

        let (old_nick, was_registered) = {
            let client = client_arc.read().await;
            (client.nick.clone(), client.registered())
        };

        // Renaming to the exact same string (not merely case-fold equal) is
        // a no-op, even though the registry lookup below is case-insensitive.
        if old_nick == *new_nick {
            return Ok(());
        }

        if let Some(existing) = ctx.registry.client_by_nick(new_nick) {
            let existing_id = existing.read().await.id;
            if existing_id != ctx.id {
                return Err(HandlerError::NicknameInUse(new_nick.clone()));
            }
        }

        if !was_registered {
            {
                let mut client = client_arc.write().await;
                client.nick = new_nick.clone();
                client.mark_nick_set();
            }
            try_finalize(ctx.registry, ctx.config, ctx.id).await;
            return Ok(());
        }

        if !ctx.registry.reserve_nick(new_nick, ctx.id) {
            return Err(HandlerError::NicknameInUse(new_nick.clone()));
        }
        ctx.registry.release_nick(&old_nick);

        let mask = client_arc.read().await.mask();
        {
            let mut client = client_arc.write().await;
            client.nick = new_nick.clone();
            client.touch();
        }

        // Rekey membership/op/voice sets in every channel this client is in,
        // and collect the distinct peers who need to observe the rename.
        let channels: Vec<String> = client_arc.read().await.channels.iter().cloned().collect();
        let mut observers = std::collections::HashSet::new();
        observers.insert(ctx.id);
        for chan_key in &channels {
            if let Some(channel) = ctx.registry.channel(chan_key) {
                let mut ch = channel.write().await;
                ch.rename_member(&old_nick, new_nick);
                for member_id in ch.members.values() {
                    observers.insert(*member_id);
                }
            }
        }

        for observer in observers {
            send_peer(ctx.registry, observer, &mask, "NICK", &[new_nick]).await;
        }

        Ok(())
    }
}
