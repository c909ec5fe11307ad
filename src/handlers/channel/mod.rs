//! Channel membership, topic, and listing commands.

use async_trait::async_trait;
use irc_proto::{Numeric, valid_channel};

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::core::send::{send_error, send_numeric, send_peer};
use crate::handlers::core::{Context, Handler};
use crate::state::channel::chan_mode;

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_owned).filter(|s| !s.is_empty()).collect()
}

async fn current_nick(ctx: &Context<'_>) -> Option<String> {
    Some(ctx.registry.client_by_id(ctx.id)?.read().await.nick.clone())
}

/// `JOIN <chans> [keys]`. Comma-split channels/keys by position; mode gates
/// are checked in the order `l`, `k`, `i`, ban.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let Some(chans_raw) = params.first() else {
            return Err(HandlerError::NeedMoreParams);
        };
        let keys = params.get(1).map(|s| split_list(s)).unwrap_or_default();
        let channels = split_list(chans_raw);

        let Some(client_arc) = ctx.registry.client_by_id(ctx.id) else {
            return Ok(());
        };
        let (nick, mask) = {
            let c = client_arc.read().await;
            (c.nick.clone(), c.mask())
        };

        for (i, name) in channels.iter().enumerate() {
            if !valid_channel(name) {
                send_error(
                    ctx.registry,
                    ctx.id,
                    &ctx.config.server_name,
                    &nick,
                    &HandlerError::NoSuchChannel(name.clone()),
                )
                .await;
                continue;
            }
            if client_arc.read().await.channels.contains(&irc_proto::irc_to_lower(name)) {
                continue; // already joined: silently skipped
            }
            let key = keys.get(i).map(String::as_str);

            let channel = ctx.registry.get_or_create_channel(name);
            let became_op;
            {
                let mut ch = channel.write().await;
                if let Some(limit) = ch.limit {
                    if ch.members.len() >= limit {
                        drop(ch);
                        send_error(
                            ctx.registry,
                            ctx.id,
                            &ctx.config.server_name,
                            &nick,
                            &HandlerError::ChannelIsFull(name.clone()),
                        )
                        .await;
                        continue;
                    }
                }
                if ch.modes.contains(&chan_mode::KEY) && ch.key.as_deref() != key {
                    drop(ch);
                    send_error(
                        ctx.registry,
                        ctx.id,
                        &ctx.config.server_name,
                        &nick,
                        &HandlerError::BadChannelKey(name.clone()),
                    )
                    .await;
                    continue;
                }
                if ch.modes.contains(&chan_mode::INVITE_ONLY) && !ch.invites.contains(&nick) {
                    drop(ch);
                    send_error(
                        ctx.registry,
                        ctx.id,
                        &ctx.config.server_name,
                        &nick,
                        &HandlerError::InviteOnlyChan(name.clone()),
                    )
                    .await;
                    continue;
                }
                if irc_proto::is_banned(&ch.bans, &mask) {
                    drop(ch);
                    send_error(
                        ctx.registry,
                        ctx.id,
                        &ctx.config.server_name,
                        &nick,
                        &HandlerError::BannedFromChan(name.clone()),
                    )
                    .await;
                    continue;
                }
                became_op = ch.is_empty();
                ch.add_member(nick.clone(), ctx.id, became_op);
            }

            client_arc
                .write()
                .await
                .channels
                .insert(irc_proto::irc_to_lower(name));

            let members: Vec<_> = channel.read().await.members.values().copied().collect();
            for member_id in &members {
                send_peer(ctx.registry, *member_id, &mask, "JOIN", &[name]).await;
            }

            send_topic_reply(ctx, name).await;
            send_names_reply(ctx, name).await;
        }

        Ok(())
    }
}

async fn send_topic_reply(ctx: &Context<'_>, name: &str) {
    let Some(channel) = ctx.registry.channel(name) else {
        return;
    };
    let ch = channel.read().await;
    if ch.topic.is_empty() {
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_NOTOPIC,
            &[name, "No topic is set"],
        )
        .await;
    } else {
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_TOPIC,
            &[name, &ch.topic],
        )
        .await;
    }
}

async fn send_names_reply(ctx: &Context<'_>, name: &str) {
    let Some(channel) = ctx.registry.channel(name) else {
        return;
    };
    let names = {
        let ch = channel.read().await;
        ch.members
            .keys()
            .map(|n| format!("{}{}", ch.member_prefix(n), n))
            .collect::<Vec<_>>()
            .join(" ")
    };
    send_numeric(
        ctx.registry,
        ctx.id,
        &ctx.config.server_name,
        Numeric::RPL_NAMREPLY,
        &["=", name, &names],
    )
    .await;
    send_numeric(
        ctx.registry,
        ctx.id,
        &ctx.config.server_name,
        Numeric::RPL_ENDOFNAMES,
        &[name, "End of /NAMES list"],
    )
    .await;
}

pub struct PartHandler;

#[async_trait]
impl Handler for PartHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let Some(chans_raw) = params.first() else {
            return Err(HandlerError::NeedMoreParams);
        };
        let msg = params.get(1).cloned();
        let Some(nick) = current_nick(ctx).await else {
            return Ok(());
        };
        let mask = ctx
            .registry
            .client_by_id(ctx.id)
            .unwrap()
            .read()
            .await
            .mask();

        for name in split_list(chans_raw) {
            let Some(channel) = ctx.registry.channel(&name) else {
                send_error(
                    ctx.registry,
                    ctx.id,
                    &ctx.config.server_name,
                    &nick,
                    &HandlerError::NoSuchChannel(name),
                )
                .await;
                continue;
            };
            if !channel.read().await.has_member(&nick) {
                send_error(
                    ctx.registry,
                    ctx.id,
                    &ctx.config.server_name,
                    &nick,
                    &HandlerError::NotOnChannel(name),
                )
                .await;
                continue;
            }
            let reason = msg.clone().unwrap_or_else(|| nick.clone());

            let members: Vec<_> = channel.read().await.members.values().copied().collect();
            for member_id in &members {
                send_peer(ctx.registry, *member_id, &mask, "PART", &[&name, &reason]).await;
            }

            let emptied = {
                let mut ch = channel.write().await;
                ch.remove_member(&nick);
                ch.is_empty()
            };
            if emptied {
                ctx.registry.remove_channel(&name);
            }
            if let Some(c) = ctx.registry.client_by_id(ctx.id) {
                c.write().await.channels.remove(&irc_proto::irc_to_lower(&name));
            }
        }
        Ok(())
    }
}

pub struct TopicHandler;

#[async_trait]
impl Handler for TopicHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let Some(name) = params.first() else {
            return Err(HandlerError::NeedMoreParams);
        };
        let Some(channel) = ctx.registry.channel(name) else {
            return Err(HandlerError::NoSuchChannel(name.clone()));
        };

        if params.len() < 2 {
            send_topic_reply(ctx, name).await;
            return Ok(());
        }

        let Some(nick) = current_nick(ctx).await else {
            return Ok(());
        };
        {
            let ch = channel.read().await;
            if !ch.has_member(&nick) {
                return Err(HandlerError::NotOnChannel(name.clone()));
            }
            if ch.modes.contains(&chan_mode::TOPIC_LOCK) && !ch.is_op(&nick) {
                return Err(HandlerError::ChanOPrivsNeeded(name.clone()));
            }
        }

        let new_topic = params[1].clone();
        let mask = ctx.registry.client_by_id(ctx.id).unwrap().read().await.mask();
        let members: Vec<_> = {
            let mut ch = channel.write().await;
            ch.set_topic(new_topic.clone(), nick.clone());
            ch.members.values().copied().collect()
        };
        for member_id in &members {
            send_peer(ctx.registry, *member_id, &mask, "TOPIC", &[name, &new_topic]).await;
        }
        Ok(())
    }
}

pub struct NamesHandler;

#[async_trait]
impl Handler for NamesHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let targets = match params.first() {
            Some(raw) => split_list(raw),
            None => all_channel_names(ctx).await,
        };
        for name in targets {
            send_names_reply(ctx, &name).await;
        }
        Ok(())
    }
}

async fn all_channel_names(ctx: &Context<'_>) -> Vec<String> {
    ctx.registry.channel_names().await
}

pub struct ListHandler;

#[async_trait]
impl Handler for ListHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let names = match params.first() {
            Some(raw) => split_list(raw),
            None => all_channel_names(ctx).await,
        };
        for name in names {
            let Some(channel) = ctx.registry.channel(&name) else {
                continue;
            };
            let ch = channel.read().await;
            send_numeric(
                ctx.registry,
                ctx.id,
                &ctx.config.server_name,
                Numeric::RPL_LIST,
                &[&ch.name, &ch.members.len().to_string(), &ch.topic],
            )
            .await;
        }
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_LISTEND,
            &["End of /LIST"],
        )
        .await;
        Ok(())
    }
}

/// `INVITE <nick> <chan>`. Preserves the source's existence-before-membership
/// ordering quirk: a nonexistent channel still allows the invite to proceed
/// (the channel simply does not exist yet to check membership against),
/// rather than failing before the target-nick lookup.
pub struct InviteHandler;

#[async_trait]
impl Handler for InviteHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let (Some(target_nick), Some(chan_name)) = (params.first(), params.get(1)) else {
            return Err(HandlerError::NeedMoreParams);
        };
        let Some(target) = ctx.registry.client_by_nick(target_nick) else {
            return Err(HandlerError::NoSuchNick(target_nick.clone()));
        };
        let Some(nick) = current_nick(ctx).await else {
            return Ok(());
        };

        if let Some(channel) = ctx.registry.channel(chan_name) {
            let mut ch = channel.write().await;
            if !ch.has_member(&nick) {
                return Err(HandlerError::NotOnChannel(chan_name.clone()));
            }
            if ch.modes.contains(&chan_mode::INVITE_ONLY) && !ch.is_op(&nick) {
                return Err(HandlerError::ChanOPrivsNeeded(chan_name.clone()));
            }
            ch.invites.insert(target_nick.clone());
        }

        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_INVITING,
            &[target_nick, chan_name],
        )
        .await;

        let mask = ctx.registry.client_by_id(ctx.id).unwrap().read().await.mask();
        let target_id = target.read().await.id;
        send_peer(ctx.registry, target_id, &mask, "INVITE", &[target_nick, chan_name]).await;

        Ok(())
    }
}

pub struct KickHandler;

#[async_trait]
impl Handler for KickHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let (Some(chan_name), Some(target_nick)) = (params.first(), params.get(1)) else {
            return Err(HandlerError::NeedMoreParams);
        };
        let reason = params.get(2).cloned().unwrap_or_else(|| target_nick.clone());

        let Some(channel) = ctx.registry.channel(chan_name) else {
            return Err(HandlerError::NoSuchChannel(chan_name.clone()));
        };
        let Some(nick) = current_nick(ctx).await else {
            return Ok(());
        };

        {
            let ch = channel.read().await;
            if !ch.is_op(&nick) {
                return Err(HandlerError::ChanOPrivsNeeded(chan_name.clone()));
            }
            if !ch.has_member(target_nick) {
                return Err(HandlerError::UserNotInChannel(
                    target_nick.clone(),
                    chan_name.clone(),
                ));
            }
        }

        let mask = ctx.registry.client_by_id(ctx.id).unwrap().read().await.mask();
        let members: Vec<_> = channel.read().await.members.values().copied().collect();
        for member_id in &members {
            send_peer(
                ctx.registry,
                *member_id,
                &mask,
                "KICK",
                &[chan_name, target_nick, &reason],
            )
            .await;
        }

        let emptied = {
            let mut ch = channel.write().await;
            ch.remove_member(target_nick);
            ch.is_empty()
        };
        if emptied {
            ctx.registry.remove_channel(chan_name);
        }
        if let Some(target) = ctx.registry.client_by_nick(target_nick) {
            let id = target.read().await.id;
            if let Some(c) = ctx.registry.client_by_id(id) {
                c.write().await.channels.remove(&irc_proto::irc_to_lower(chan_name));
            }
        }

        Ok(())
    }
}
