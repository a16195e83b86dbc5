use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::path::Path;

/// Listener settings shared by every service.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Builder layering an optional YAML file under `APP_`-prefixed environment
/// variables (`APP_SERVER__PORT=8080` sets `server.port`).
///
/// Services add their own defaults and overrides before calling `build()`.
pub fn layered_builder(config_file: &Path) -> ConfigBuilder<DefaultState> {
    Config::builder()
        .add_source(File::from(config_file).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
}
