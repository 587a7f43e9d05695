//! `cardroom` server binary.
//!
//! Listens on `HOST:PORT` (default `0.0.0.0:3000`). Log verbosity follows
//! `RUST_LOG` (default `info`).

use cardroom::{CardroomError, CardroomServer, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CardroomError> {
    // Initialise tracing (respects RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let server = CardroomServer::builder().config(config).build().await?;

    match server.local_addr() {
        Ok(addr) => tracing::info!("Cardroom listening on {addr}"),
        Err(e) => tracing::warn!(error = %e, "bound, but local address unknown"),
    }

    server.run().await
}
