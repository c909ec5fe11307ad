//! Per-connection read/write loop.
//!
//! Each accepted WebSocket splits into a reader, driven directly by this
//! task, and a writer task owning the sink; handlers only ever push onto a
//! client's `outbox`, so one slow peer cannot stall fan-out to others.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio_tungstenite::WebSocketStream;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::HandlerError;
use crate::handlers::connection::quit::quit_client;
use crate::handlers::core::{Context, Dispatcher};
use crate::state::{Client, Registry};

/// Drive one connection end to end: register the client, run the read loop,
/// and tear down on disconnect.
pub async fn run(
    ws: WebSocketStream<TcpStream>,
    peer_addr: SocketAddr,
    config: Arc<Config>,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
) {
    let id = Uuid::new_v4();
    let (mut sink, mut stream) = ws.split();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if sink.send(WsMessage::Text(line.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let client = Client::new(id, peer_addr.ip().to_string(), tx);
    registry.insert_client_with_id(id, Arc::new(tokio::sync::RwLock::new(client)));
    info!(%id, %peer_addr, "connection accepted");

    let ctx = Context {
        id,
        registry: &registry,
        config: &config,
    };

    loop {
        let frame = match stream.next().await {
            Some(Ok(WsMessage::Text(text))) => text.to_string(),
            Some(Ok(WsMessage::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(%id, error = %e, "websocket read error");
                break;
            }
        };

        let mut quit_requested = false;
        for raw_line in frame.split('\n') {
            let line = unwrap_envelope(raw_line);
            let Some(parsed) = irc_proto::parse_line(&line) else {
                continue;
            };

            let registered = match registry.client_by_id(id) {
                Some(c) => c.read().await.registered(),
                None => false,
            };

            match dispatcher
                .dispatch(&ctx, registered, &parsed.command, &parsed.params)
                .await
            {
                Ok(()) => {}
                Err(HandlerError::Quit(_)) => {
                    quit_requested = true;
                    break;
                }
                Err(e) => {
                    if let Some(client) = registry.client_by_id(id) {
                        let nick = client.read().await.nick.clone();
                        if let Some((code, params)) = e.to_numeric(&nick) {
                            let refs: Vec<&str> = params.iter().skip(1).map(String::as_str).collect();
                            crate::handlers::core::send::send_numeric(
                                &registry,
                                id,
                                &config.server_name,
                                code,
                                &refs,
                            )
                            .await;
                        }
                    }
                }
            }
        }
        if quit_requested {
            break;
        }
    }

    // QuitHandler already ran cleanup if the client issued QUIT explicitly;
    // this is a no-op in that case since the client is already gone from the
    // registry.
    quit_client(&ctx, None).await;
    writer.abort();
    debug!(%id, "connection closed");
}

/// A frame beginning with `{` is a JSON envelope `{"line": "..."}`; decode
/// failure falls back to treating the frame as raw text, per `spec.md` §6.
fn unwrap_envelope(raw: &str) -> String {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with('{') {
        return raw.to_string();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("line").and_then(|v| v.as_str()) {
            Some(line) => line.to_string(),
            None => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_unwraps_line_field() {
        assert_eq!(unwrap_envelope(r#"{"line": "NICK alice"}"#), "NICK alice");
    }

    #[test]
    fn non_json_frame_passes_through() {
        assert_eq!(unwrap_envelope("NICK alice"), "NICK alice");
    }

    #[test]
    fn malformed_json_falls_back_to_raw() {
        assert_eq!(unwrap_envelope("{not json"), "{not json");
    }
}
