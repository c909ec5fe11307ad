//! `MODE`: channel mode toggles and the two-flag user mode subset.

use async_trait::async_trait;
use irc_proto::{Numeric, valid_channel};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::send::{send_numeric, send_peer};
use crate::handlers::core::{Context, Handler};
use crate::state::channel::chan_mode;
use crate::state::client::user_mode;

pub struct ModeHandler;

#[async_trait]
impl Handler for ModeHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let Some(target) = params.first() else {
            return Err(HandlerError::NeedMoreParams);
        };
        if valid_channel(target) {
            handle_channel_mode(ctx, target, &params[1..]).await
        } else {
            handle_user_mode(ctx, target, &params[1..]).await
        }
    }
}

async fn handle_user_mode(ctx: &Context<'_>, target_nick: &str, args: &[String]) -> HandlerResult {
    let Some(client_arc) = ctx.registry.client_by_id(ctx.id) else {
        return Ok(());
    };
    let (nick, is_oper) = {
        let c = client_arc.read().await;
        (c.nick.clone(), c.is_oper())
    };

    if !nick.eq_ignore_ascii_case(target_nick) && !is_oper {
        return Err(HandlerError::UsersDontMatch);
    }

    let Some(target) = ctx.registry.client_by_nick(target_nick) else {
        return Err(HandlerError::NoSuchNick(target_nick.to_string()));
    };

    let Some(change) = args.first() else {
        let modes: String = target.read().await.modes.iter().collect();
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_UMODEIS,
            &[&format!("+{modes}")],
        )
        .await;
        return Ok(());
    };

    let mut adding = true;
    let mut unknown_flag = false;
    for c in change.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            user_mode::INVISIBLE | user_mode::OPER => {
                let mut t = target.write().await;
                if adding {
                    t.modes.insert(c);
                } else {
                    t.modes.remove(&c);
                }
            }
            _ => unknown_flag = true,
        }
    }

    let mask = client_arc.read().await.mask();
    send_peer(ctx.registry, ctx.id, &mask, "MODE", &[target_nick, change.as_str()]).await;

    if unknown_flag {
        return Err(HandlerError::UModeUnknownFlag);
    }
    Ok(())
}

async fn handle_channel_mode(ctx: &Context<'_>, chan_name: &str, args: &[String]) -> HandlerResult {
    let Some(channel) = ctx.registry.channel(chan_name) else {
        return Err(HandlerError::NoSuchChannel(chan_name.to_string()));
    };
    let Some(client_arc) = ctx.registry.client_by_id(ctx.id) else {
        return Ok(());
    };
    let (nick, is_global_op) = {
        let c = client_arc.read().await;
        (c.nick.clone(), c.is_oper())
    };

    let Some(mode_string) = args.first() else {
        let ch = channel.read().await;
        let mut letters: Vec<char> = ch.modes.iter().copied().collect();
        letters.sort_unstable();
        let letters: String = letters.into_iter().collect();
        let mut parts = vec![format!("+{letters}")];
        if let Some(key) = &ch.key {
            parts.push(key.clone());
        }
        if let Some(limit) = ch.limit {
            parts.push(limit.to_string());
        }
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_CHANNELMODEIS,
            &[chan_name, &parts.join(" ")],
        )
        .await;
        return Ok(());
    };

    if !is_global_op && !channel.read().await.is_op(&nick) {
        return Err(HandlerError::ChanOPrivsNeeded(chan_name.to_string()));
    }

    let mut extra_args = args[1..].iter();
    let mut adding = true;
    let mut applied: Vec<char> = Vec::new();
    let mask = client_arc.read().await.mask();

    for c in mode_string.chars() {
        match c {
            '+' => {
                adding = true;
                applied.push('+');
            }
            '-' => {
                adding = false;
                applied.push('-');
            }
            chan_mode::INVITE_ONLY
            | chan_mode::MODERATED
            | chan_mode::NO_EXTERNAL
            | chan_mode::PRIVATE
            | chan_mode::SECRET
            | chan_mode::TOPIC_LOCK => {
                let mut ch = channel.write().await;
                if adding {
                    ch.modes.insert(c);
                } else {
                    ch.modes.remove(&c);
                }
                applied.push(c);
            }
            chan_mode::KEY => {
                let mut ch = channel.write().await;
                if adding {
                    if let Some(key) = extra_args.next() {
                        ch.key = Some(key.clone());
                        ch.modes.insert(c);
                        applied.push(c);
                    }
                } else {
                    ch.key = None;
                    ch.modes.remove(&c);
                    applied.push(c);
                }
            }
            chan_mode::LIMIT => {
                let mut ch = channel.write().await;
                if adding {
                    if let Some(n) = extra_args.next().and_then(|s| s.parse::<usize>().ok()) {
                        ch.limit = Some(n);
                        ch.modes.insert(c);
                        applied.push(c);
                    }
                    // Non-integer limit: silently ignored, per spec.
                } else {
                    ch.limit = None;
                    ch.modes.remove(&c);
                    applied.push(c);
                }
            }
            chan_mode::BAN => match extra_args.next() {
                Some(mask_arg) => {
                    let mut ch = channel.write().await;
                    if adding {
                        if !ch.bans.contains(mask_arg) {
                            ch.bans.push(mask_arg.clone());
                        }
                    } else {
                        ch.bans.retain(|b| b != mask_arg);
                    }
                    let members: Vec<_> = ch.members.values().copied().collect();
                    drop(ch);
                    let sign = if adding { "+" } else { "-" };
                    for member_id in members {
                        send_peer(
                            ctx.registry,
                            member_id,
                            &mask,
                            "MODE",
                            &[chan_name, &format!("{sign}b"), mask_arg],
                        )
                        .await;
                    }
                }
                None => {
                    let bans = channel.read().await.bans.clone();
                    for ban in &bans {
                        send_numeric(
                            ctx.registry,
                            ctx.id,
                            &ctx.config.server_name,
                            Numeric::RPL_BANLIST,
                            &[chan_name, ban],
                        )
                        .await;
                    }
                    send_numeric(
                        ctx.registry,
                        ctx.id,
                        &ctx.config.server_name,
                        Numeric::RPL_ENDOFBANLIST,
                        &[chan_name, "End of channel ban list"],
                    )
                    .await;
                }
            },
            'o' | 'v' => {
                let Some(target_nick) = extra_args.next() else {
                    continue;
                };
                let is_member = channel.read().await.has_member(target_nick);
                if !is_member {
                    continue;
                }
                {
                    let mut ch = channel.write().await;
                    let set = if c == 'o' { &mut ch.ops } else { &mut ch.voices };
                    if adding {
                        set.insert(target_nick.clone());
                    } else {
                        set.remove(target_nick);
                    }
                }
                let members: Vec<_> = channel.read().await.members.values().copied().collect();
                let sign = if adding { "+" } else { "-" };
                for member_id in members {
                    send_peer(
                        ctx.registry,
                        member_id,
                        &mask,
                        "MODE",
                        &[chan_name, &format!("{sign}{c}"), target_nick],
                    )
                    .await;
                }
            }
            _ => {}
        }
    }

    let mode_applied: String = applied.into_iter().collect();
    if !mode_applied.trim_matches(['+', '-']).is_empty() {
        let members: Vec<_> = channel.read().await.members.values().copied().collect();
        for member_id in members {
            send_peer(ctx.registry, member_id, &mask, "MODE", &[chan_name, &mode_applied]).await;
        }
    }

    Ok(())
}
