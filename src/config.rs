//! Configuration loading: an optional TOML file merged with CLI flags.
//!
//! CLI flags win when both are present. `--config` is optional; when it is
//! omitted, `config.toml` in the working directory is tried and silently
//! skipped if it does not exist — built-in defaults apply either way.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub name: String,
    pub network: String,
    pub version: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: "IRCWSD".to_string(),
            network: "IRCWSD-NET".to_string(),
            version: "1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenSection {
    pub host: String,
    pub port: u16,
}

impl Default for ListenSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6667,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MotdSection {
    pub lines: Vec<String>,
    pub file: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TomlConfig {
    server: ServerSection,
    listen: ListenSection,
    motd: MotdSection,
}

/// Fully resolved server configuration: TOML fields with CLI overrides applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub network: String,
    pub version: String,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub motd: Vec<String>,
}

const DEFAULT_MOTD: &[&str] = &["Welcome!", "Be excellent to each other."];

impl Config {
    /// Load the optional TOML file at `path` and merge in CLI-derived overrides.
    /// A missing file at `path` is not an error: defaults apply.
    pub fn load(path: &str, cli: CliOverrides) -> anyhow::Result<Self> {
        let toml_cfg = if Path::new(path).exists() {
            let text = std::fs::read_to_string(path)?;
            toml::from_str::<TomlConfig>(&text)?
        } else {
            TomlConfig::default()
        };

        let motd = if !toml_cfg.motd.file.is_empty() {
            std::fs::read_to_string(&toml_cfg.motd.file)?
                .lines()
                .map(str::to_owned)
                .collect()
        } else if !toml_cfg.motd.lines.is_empty() {
            toml_cfg.motd.lines
        } else {
            DEFAULT_MOTD.iter().map(|s| s.to_string()).collect()
        };

        Ok(Self {
            server_name: toml_cfg.server.name,
            network: toml_cfg.server.network,
            version: toml_cfg.server.version,
            host: cli.host.unwrap_or(toml_cfg.listen.host),
            port: cli.port.unwrap_or(toml_cfg.listen.port),
            debug: cli.debug,
            motd,
        })
    }
}

/// CLI-supplied overrides, parsed by [`CliOverrides::from_args`].
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config_path: Option<String>,
}

impl CliOverrides {
    /// Parse `--host`, `--port`, `--debug`, and `--config <path>` from the
    /// process argument list. Unrecognized flags are ignored.
    pub fn from_args() -> Self {
        let mut out = Self::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" => out.host = args.next(),
                "--port" => out.port = args.next().and_then(|p| p.parse().ok()),
                "--debug" => out.debug = true,
                "--config" => out.config_path = args.next(),
                _ => {}
            }
        }
        out
    }

    pub fn resolved_config_path(&self) -> String {
        self.config_path
            .clone()
            .unwrap_or_else(|| "config.toml".to_string())
    }
}
