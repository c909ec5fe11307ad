//! Small helpers for rendering and enqueueing reply lines.
//!
//! Handlers never touch a socket directly; they render a line and push it
//! onto the target client's `outbox`, which its dedicated writer task drains.

use irc_proto::{Numeric, numeric_reply, peer_line};

use crate::error::HandlerError;
use crate::state::{ClientId, Registry};

/// Send a numeric reply to `id`, looking up its current nick as the target.
/// A missing client (already disconnected) is not an error worth surfacing.
pub async fn send_numeric(
    registry: &Registry,
    id: ClientId,
    server_name: &str,
    code: Numeric,
    params: &[&str],
) {
    let Some(client) = registry.client_by_id(id) else {
        return;
    };
    let nick = client.read().await.nick.clone();
    let line = numeric_reply(server_name, code, &nick, params);
    let _ = client.read().await.send_line(line);
}

/// Send the numeric reply for a protocol-level error without aborting the
/// caller — for handlers that must keep processing later items in a
/// comma-separated list (`JOIN`, `PART`) after one entry fails.
pub async fn send_error(
    registry: &Registry,
    id: ClientId,
    server_name: &str,
    nick: &str,
    err: &HandlerError,
) {
    let Some((code, params)) = err.to_numeric(nick) else {
        return;
    };
    let refs: Vec<&str> = params.iter().skip(1).map(String::as_str).collect();
    send_numeric(registry, id, server_name, code, &refs).await;
}

/// Send a peer-originated line (e.g. `PRIVMSG`, `JOIN`, `MODE`) to `id`.
pub async fn send_peer(
    registry: &Registry,
    id: ClientId,
    origin_mask: &str,
    command: &str,
    params: &[&str],
) {
    let Some(client) = registry.client_by_id(id) else {
        return;
    };
    let line = peer_line(origin_mask, command, params);
    let _ = client.read().await.send_line(line);
}
