//! Informational and lookup commands: `WHO`, `WHOIS`, `AWAY`, `ISON`,
//! `USERHOST`, `VERSION`, `TIME`, `INFO`, `LUSERS`, `MOTD`, `OPER`.

use async_trait::async_trait;
use irc_proto::Numeric;

use crate::error::HandlerResult;
use crate::handlers::connection::welcome::{send_lusers, send_motd};
use crate::handlers::core::send::send_numeric;
use crate::handlers::core::{Context, Handler};

pub struct WhoHandler;

#[async_trait]
impl Handler for WhoHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let mask = params.first().cloned().unwrap_or_else(|| "*".to_string());

        if let Some(channel) = ctx.registry.channel(&mask) {
            let ch = channel.read().await;
            for (nick, id) in &ch.members {
                let Some(member) = ctx.registry.client_by_id(*id) else {
                    continue;
                };
                let m = member.read().await;
                let flag = if m.is_away() { "G" } else { "H" };
                let flag = format!("{flag}{}", ch.member_prefix(nick));
                send_numeric(
                    ctx.registry,
                    ctx.id,
                    &ctx.config.server_name,
                    Numeric::RPL_WHOREPLY,
                    &[
                        &ch.name,
                        &m.user,
                        &m.host,
                        &ctx.config.server_name,
                        nick,
                        &flag,
                        &format!("0 {}", m.realname),
                    ],
                )
                .await;
            }
        } else {
            for id in ctx.registry.all_client_ids() {
                let Some(client) = ctx.registry.client_by_id(id) else {
                    continue;
                };
                let c = client.read().await;
                if !glob_matches_nick(&mask, &c.nick) {
                    continue;
                }
                let flag = if c.is_away() { "G" } else { "H" };
                send_numeric(
                    ctx.registry,
                    ctx.id,
                    &ctx.config.server_name,
                    Numeric::RPL_WHOREPLY,
                    &[
                        "*",
                        &c.user,
                        &c.host,
                        &ctx.config.server_name,
                        &c.nick,
                        flag,
                        &format!("0 {}", c.realname),
                    ],
                )
                .await;
            }
        }

        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_ENDOFWHO,
            &[&mask, "End of /WHO list"],
        )
        .await;
        Ok(())
    }
}

fn glob_matches_nick(mask: &str, nick: &str) -> bool {
    irc_proto::glob_to_regex(mask).is_some_and(|re| re.is_match(nick))
}

pub struct WhoisHandler;

#[async_trait]
impl Handler for WhoisHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let Some(nick) = params.first() else {
            return Err(crate::error::HandlerError::NeedMoreParams);
        };
        let Some(target) = ctx.registry.client_by_nick(nick) else {
            return Err(crate::error::HandlerError::NoSuchNick(nick.clone()));
        };
        let t = target.read().await;

        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_WHOISUSER,
            &[&t.nick, &t.user, &t.host, "*", &t.realname],
        )
        .await;
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_WHOISSERVER,
            &[&t.nick, &ctx.config.server_name, &ctx.config.network],
        )
        .await;

        if !t.channels.is_empty() {
            let mut shown = Vec::new();
            for chan_key in &t.channels {
                if let Some(channel) = ctx.registry.channel(chan_key) {
                    let ch = channel.read().await;
                    shown.push(format!("{}{}", ch.member_prefix(&t.nick), ch.name));
                }
            }
            send_numeric(
                ctx.registry,
                ctx.id,
                &ctx.config.server_name,
                Numeric::RPL_WHOISCHANNELS,
                &[&t.nick, &shown.join(" ")],
            )
            .await;
        }

        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_ENDOFWHOIS,
            &[&t.nick, "End of /WHOIS list"],
        )
        .await;
        Ok(())
    }
}

pub struct AwayHandler;

#[async_trait]
impl Handler for AwayHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let Some(client) = ctx.registry.client_by_id(ctx.id) else {
            return Ok(());
        };
        let msg = params.first().cloned();
        let setting_away = msg.is_some();
        client.write().await.away_msg = msg;

        let code = if setting_away {
            Numeric::RPL_NOWAWAY
        } else {
            Numeric::RPL_UNAWAY
        };
        let text = if setting_away {
            "You have been marked as being away"
        } else {
            "You are no longer marked as being away"
        };
        send_numeric(ctx.registry, ctx.id, &ctx.config.server_name, code, &[text]).await;
        Ok(())
    }
}

pub struct IsonHandler;

#[async_trait]
impl Handler for IsonHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let mut present = Vec::new();
        for nick in params {
            if let Some(client) = ctx.registry.client_by_nick(nick) {
                present.push(client.read().await.nick.clone());
            }
        }
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_ISON,
            &[&present.join(" ")],
        )
        .await;
        Ok(())
    }
}

pub struct UserhostHandler;

#[async_trait]
impl Handler for UserhostHandler {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult {
        let mut entries = Vec::new();
        for nick in params.iter().take(5) {
            if let Some(client) = ctx.registry.client_by_nick(nick) {
                let c = client.read().await;
                let sign = if c.is_away() { '-' } else { '+' };
                entries.push(format!("{}={}{}@{}", c.nick, sign, c.user, c.host));
            }
        }
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_USERHOST,
            &[&entries.join(" ")],
        )
        .await;
        Ok(())
    }
}

pub struct VersionHandler;

#[async_trait]
impl Handler for VersionHandler {
    async fn handle(&self, ctx: &Context<'_>, _params: &[String]) -> HandlerResult {
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_VERSION,
            &[
                &format!("{}.{}", ctx.config.version, ctx.config.server_name),
                &ctx.config.server_name,
                "",
            ],
        )
        .await;
        Ok(())
    }
}

pub struct TimeHandler;

#[async_trait]
impl Handler for TimeHandler {
    async fn handle(&self, ctx: &Context<'_>, _params: &[String]) -> HandlerResult {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::RPL_TIME,
            &[&ctx.config.server_name, &now],
        )
        .await;
        Ok(())
    }
}

pub struct InfoHandler;

#[async_trait]
impl Handler for InfoHandler {
    async fn handle(&self, ctx: &Context<'_>, _params: &[String]) -> HandlerResult {
        let server = &ctx.config.server_name;
        send_numeric(
            ctx.registry,
            ctx.id,
            server,
            Numeric::RPL_INFO,
            &[&format!("{} v{}", server, ctx.config.version)],
        )
        .await;
        send_numeric(
            ctx.registry,
            ctx.id,
            server,
            Numeric::RPL_INFO,
            &["A WebSocket-transport IRC server."],
        )
        .await;
        send_numeric(ctx.registry, ctx.id, server, Numeric::RPL_INFO, &["Written in Rust."]).await;
        send_numeric(
            ctx.registry,
            ctx.id,
            server,
            Numeric::RPL_ENDOFINFO,
            &["End of /INFO list"],
        )
        .await;
        Ok(())
    }
}

pub struct LusersHandler;

#[async_trait]
impl Handler for LusersHandler {
    async fn handle(&self, ctx: &Context<'_>, _params: &[String]) -> HandlerResult {
        send_lusers(ctx.registry, ctx.config, ctx.id).await;
        Ok(())
    }
}

pub struct MotdHandler;

#[async_trait]
impl Handler for MotdHandler {
    async fn handle(&self, ctx: &Context<'_>, _params: &[String]) -> HandlerResult {
        send_motd(ctx.registry, ctx.config, ctx.id).await;
        Ok(())
    }
}

pub struct OperHandler;

#[async_trait]
impl Handler for OperHandler {
    async fn handle(&self, ctx: &Context<'_>, _params: &[String]) -> HandlerResult {
        send_numeric(
            ctx.registry,
            ctx.id,
            &ctx.config.server_name,
            Numeric::ERR_NOPRIVILEGES,
            &["Permission Denied- You're not an IRC operator"],
        )
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matches_nick_wildcard() {
        assert!(glob_matches_nick("al*", "alice"));
        assert!(!glob_matches_nick("al*", "bob"));
    }
}
