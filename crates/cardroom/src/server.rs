//! `CardroomServer` builder and accept loop.
//!
//! This is the entry point for running a card-room server. It ties
//! together all the layers: transport → protocol → hub → rooms.

use cardroom_protocol::JsonCodec;
use cardroom_room::{RegistryConfig, RoomRegistry};
use cardroom_transport::{Transport, WebSocketTransport};

use crate::CardroomError;
use crate::config::{DEFAULT_HUB_CHANNEL_SIZE, ServerConfig};
use crate::handler::handle_connection;
use crate::hub::{HubHandle, spawn_hub};

/// Builder for configuring and starting a Cardroom server.
///
/// # Example
///
/// ```rust,no_run
/// use cardroom::CardroomServer;
///
/// # async fn start() -> Result<(), cardroom::CardroomError> {
/// let server = CardroomServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct CardroomServerBuilder {
    bind_addr: String,
    registry: RegistryConfig,
    hub_channel_size: usize,
}

impl CardroomServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            registry: RegistryConfig::default(),
            hub_channel_size: DEFAULT_HUB_CHANNEL_SIZE,
        }
    }

    /// Takes every setting from `config`.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.bind_addr = config.bind_addr;
        self.registry = config.registry;
        self.hub_channel_size = config.hub_channel_size.max(1);
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the table and lobby presets.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry = config;
        self
    }

    /// Sets the hub's command channel capacity.
    pub fn hub_channel_size(mut self, size: usize) -> Self {
        self.hub_channel_size = size.max(1);
        self
    }

    /// Validates the room presets, binds the listener, and starts the hub.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<CardroomServer, CardroomError> {
        let registry = RoomRegistry::new(self.registry)?;
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let hub = spawn_hub(registry, self.hub_channel_size);

        Ok(CardroomServer {
            transport,
            hub,
            codec: JsonCodec,
        })
    }
}

impl Default for CardroomServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Cardroom server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CardroomServer {
    transport: WebSocketTransport,
    hub: HubHandle,
    codec: JsonCodec,
}

impl CardroomServer {
    /// Creates a new builder.
    pub fn builder() -> CardroomServerBuilder {
        CardroomServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle to the hub, e.g. for snapshots.
    pub fn hub(&self) -> HubHandle {
        self.hub.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), CardroomError> {
        tracing::info!("Cardroom server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let hub = self.hub.clone();
                    let codec = self.codec;
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, hub, codec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
