//! The post-registration numeric burst: welcome, MOTD, LUSERS.

use irc_proto::Numeric;

use crate::handlers::core::send::send_numeric;
use crate::state::{ClientId, Registry};

/// Attempt to complete registration once both `NICK` and `USER` have
/// latched. Installs the client in the nick registry and sends the
/// `001`-`004`, MOTD, and `LUSERS` bursts, in that order.
pub async fn try_finalize(registry: &Registry, config: &crate::config::Config, id: ClientId) {
    let Some(client_arc) = registry.client_by_id(id) else {
        return;
    };

    let nick = {
        let mut client = client_arc.write().await;
        if !client.registered() || registry.nick_taken(&client.nick) {
            return;
        }
        client.touch();
        client.nick.clone()
    };

    if !registry.reserve_nick(&nick, id) {
        return;
    }

    send_welcome_burst(registry, config, id).await;
}

pub async fn send_welcome_burst(registry: &Registry, config: &crate::config::Config, id: ClientId) {
    let server = &config.server_name;

    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_WELCOME,
        &["Welcome to the Internet Relay Network"],
    )
    .await;
    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_YOURHOST,
        &[&format!(
            "Your host is {}, running version {}",
            server, config.version
        )],
    )
    .await;
    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_CREATED,
        &["This server was created just now"],
    )
    .await;
    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_MYINFO,
        &[server, &config.version, "o", "imnopqrstv"],
    )
    .await;

    send_motd(registry, config, id).await;
    send_lusers(registry, config, id).await;
}

pub async fn send_motd(registry: &Registry, config: &crate::config::Config, id: ClientId) {
    let server = &config.server_name;
    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_MOTDSTART,
        &[&format!("- {} Message of the day - ", server)],
    )
    .await;
    for line in &config.motd {
        send_numeric(registry, id, server, Numeric::RPL_MOTD, &[&format!("- {line}")]).await;
    }
    send_numeric(registry, id, server, Numeric::RPL_ENDOFMOTD, &["End of /MOTD command"]).await;
}

pub async fn send_lusers(registry: &Registry, config: &crate::config::Config, id: ClientId) {
    let server = &config.server_name;
    let total = registry.client_count();
    let registered = registered_count(registry).await;
    let operators = count_operators(registry).await;
    let channels = registry.channel_count();

    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_LUSERCLIENT,
        &[&format!(
            "There are {registered} users and 0 invisible on 1 servers"
        )],
    )
    .await;
    if operators > 0 {
        send_numeric(
            registry,
            id,
            server,
            Numeric::RPL_LUSEROP,
            &[&operators.to_string(), "operator(s) online"],
        )
        .await;
    }
    let unknown = total.saturating_sub(registered);
    if unknown > 0 {
        send_numeric(
            registry,
            id,
            server,
            Numeric::RPL_LUSERUNKNOWN,
            &[&unknown.to_string(), "unknown connection(s)"],
        )
        .await;
    }
    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_LUSERCHANNELS,
        &[&channels.to_string(), "channels formed"],
    )
    .await;
    send_numeric(
        registry,
        id,
        server,
        Numeric::RPL_LUSERME,
        &[&format!("I have {registered} clients and 1 servers")],
    )
    .await;
}

async fn count_operators(registry: &Registry) -> usize {
    let mut n = 0;
    for id in registry.all_client_ids() {
        if let Some(c) = registry.client_by_id(id) {
            if c.read().await.is_oper() {
                n += 1;
            }
        }
    }
    n
}

async fn registered_count(registry: &Registry) -> usize {
    let mut n = 0;
    for id in registry.all_client_ids() {
        if let Some(c) = registry.client_by_id(id) {
            if c.read().await.registered() {
                n += 1;
            }
        }
    }
    n
}
