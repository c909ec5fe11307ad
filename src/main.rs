//! ircwsd - a WebSocket-transport IRC daemon (RFC 1459 / early RFC 2812 subset).

mod config;
mod error;
mod handlers;
mod network;
mod state;

use std::sync::Arc;
use tracing::info;

use crate::config::{CliOverrides, Config};
use crate::handlers::core::shared_dispatcher;
use crate::network::Gateway;
use crate::state::Registry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliOverrides::from_args();

    let env_filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config_path = cli.resolved_config_path();
    let config = Arc::new(Config::load(&config_path, cli)?);

    info!(host = %config.host, port = config.port, "starting ircwsd");

    let registry = Arc::new(Registry::new());
    let dispatcher = shared_dispatcher();

    let gateway = Gateway::new(config, registry, dispatcher);
    gateway.run().await
}
