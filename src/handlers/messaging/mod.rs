//! `PRIVMSG` and `NOTICE`: channel fan-out and direct user messaging.

use async_trait::async_trait;
use irc_proto::Numeric;

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::send::{send_numeric, send_peer};
use crate::handlers::core::{Context, Handler};
use crate::state::channel::chan_mode;

async fn route(ctx: &Context<'_>, params: &[String], command: &str, silent: bool) -> HandlerResult {
    let (Some(target), Some(text)) = (params.first(), params.get(1)) else {
        if silent {
            return Ok(());
        }
        return Err(HandlerError::NeedMoreParams);
    };

    let Some(client_arc) = ctx.registry.client_by_id(ctx.id) else {
        return Ok(());
    };
    let (nick, mask) = {
        let c = client_arc.read().await;
        (c.nick.clone(), c.mask())
    };

    if target.starts_with(['#', '&', '!', '+']) {
        let Some(channel) = ctx.registry.channel(target) else {
            if silent {
                return Ok(());
            }
            return Err(HandlerError::NoSuchChannel(target.clone()));
        };

        let members: Vec<_> = {
            let ch = channel.read().await;
            let is_member = ch.has_member(&nick);
            if ch.modes.contains(&chan_mode::NO_EXTERNAL) && !is_member {
                if silent {
                    return Ok(());
                }
                return Err(HandlerError::CannotSendToChan(target.clone()));
            }
            if ch.modes.contains(&chan_mode::MODERATED)
                && !ch.is_op(&nick)
                && !ch.is_voiced(&nick)
            {
                if silent {
                    return Ok(());
                }
                return Err(HandlerError::CannotSendToChan(target.clone()));
            }
            ch.members.values().copied().collect()
        };

        for member_id in members {
            if member_id == ctx.id {
                continue;
            }
            send_peer(ctx.registry, member_id, &mask, command, &[target, text]).await;
        }
        return Ok(());
    }

    let Some(recipient) = ctx.registry.client_by_nick(target) else {
        if silent {
            return Ok(());
        }
        return Err(HandlerError::NoSuchNick(target.clone()));
    };
    let (recipient_id, away) = {
        let r = recipient.read().await;
        (r.id, r.away_msg.clone())
    };

    if !silent {
        if let Some(away_msg) = away {
            send_numeric(
                ctx.registry,
                ctx.id,
                &ctx.config.server_name,
                Numeric::RPL_AWAY,
                &[target, &away_msg],
            )
            .await;
        }
    }

    send_peer(ctx.registry, recipient_id, &mask, command, &[target, text]).await;
    Ok(())
}

pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        route(ctx, params, "PRIVMSG", false).await
    }
}

/// `NOTICE` uses the same routing as `PRIVMSG` but never emits an error
/// numeric and never triggers `RPL_AWAY` — failures are silently dropped.
pub struct NoticeHandler;

#[async_trait]
impl Handler for NoticeHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        route(ctx, params, "NOTICE", true).await
    }
}
