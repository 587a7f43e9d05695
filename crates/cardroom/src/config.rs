//! Server configuration.

use cardroom_room::RegistryConfig;
use serde::{Deserialize, Serialize};

use crate::CardroomError;

/// Host bound when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port bound when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Capacity of the hub's command channel. Connection tasks wait when it
/// is full.
pub const DEFAULT_HUB_CHANNEL_SIZE: usize = 256;

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host:port` to listen on.
    pub bind_addr: String,
    /// Table and lobby presets.
    pub registry: RegistryConfig,
    pub hub_channel_size: usize,
}

impl ServerConfig {
    /// Reads `HOST` and `PORT` from the process environment.
    pub fn from_env() -> Result<Self, CardroomError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CardroomError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| CardroomError::Config(format!("PORT={raw:?}: {e}")))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            ..Self::default()
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("{DEFAULT_HOST}:{DEFAULT_PORT}"),
            registry: RegistryConfig::default(),
            hub_channel_size: DEFAULT_HUB_CHANNEL_SIZE,
        }
    }
}
