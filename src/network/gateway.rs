//! Accepts TCP connections and performs the WebSocket upgrade.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::handlers::core::Dispatcher;
use crate::state::Registry;

use super::connection;

pub struct Gateway {
    config: Arc<Config>,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
}

impl Gateway {
    pub fn new(config: Arc<Config>, registry: Arc<Registry>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config,
            registry,
            dispatcher,
        }
    }

    /// Bind and accept connections until the process is interrupted.
    ///
    /// Returns cleanly on `SIGINT` so `main` exits with status 0.
    pub async fn run(&self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        info!(%addr, "listening");

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer_addr) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            error!(error = %e, "accept failed");
                            continue;
                        }
                    };

                    let config = self.config.clone();
                    let registry = self.registry.clone();
                    let dispatcher = self.dispatcher.clone();

                    tokio::spawn(async move {
                        match tokio_tungstenite::accept_async(stream).await {
                            Ok(ws) => {
                                connection::run(ws, peer_addr, config, registry, dispatcher).await;
                            }
                            Err(e) => {
                                error!(%peer_addr, error = %e, "websocket handshake failed");
                            }
                        }
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("received interrupt, shutting down");
                    return Ok(());
                }
            }
        }
    }
}
