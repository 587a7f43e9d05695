//! Per-connection handler: decode requests, forward them to the hub, and
//! write hub events back out.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound channel with the hub
//!   2. Spawn a writer task that drains that channel onto the socket
//!   3. Loop: receive frames → decode envelopes → forward to the hub
//!   4. On exit, the drop guard queues disconnect cleanup

use std::sync::Arc;

use cardroom_protocol::{ClientEnvelope, Codec, ServerEvent};
use cardroom_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::CardroomError;
use crate::hub::HubHandle;

/// Drop guard that releases a connection's seat when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async send.
struct ConnectionGuard {
    connection_id: ConnectionId,
    hub: HubHandle,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let connection_id = self.connection_id;
        let hub = self.hub.clone();
        tokio::spawn(async move {
            if hub.disconnect(connection_id).await.is_err() {
                tracing::warn!(%connection_id, "hub gone before disconnect cleanup");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    hub: HubHandle,
    codec: C,
) -> Result<(), CardroomError>
where
    C: Codec + Clone,
{
    let connection_id = conn.id();
    let conn = Arc::new(conn);
    tracing::debug!(%connection_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    hub.connect(connection_id, tx.clone()).await?;
    let guard = ConnectionGuard {
        connection_id,
        hub: hub.clone(),
    };

    let writer = tokio::spawn(write_events(Arc::clone(&conn), rx, codec.clone()));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%connection_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%connection_id, error = %e, "recv error");
                break;
            }
        };

        let envelope: ClientEnvelope = match codec.decode(&data) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(%connection_id, error = %e, "failed to decode envelope");
                let _ = tx.send(ServerEvent::Error {
                    code: 400,
                    message: e.to_string(),
                });
                continue;
            }
        };

        hub.request(connection_id, envelope).await?;
    }

    // The hub drops its sender on disconnect; once ours is gone too the
    // writer drains what is left and exits.
    drop(tx);
    drop(guard);
    if let Err(e) = writer.await {
        tracing::warn!(%connection_id, error = %e, "writer task failed");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%connection_id, error = %e, "close after disconnect failed");
    }
    Ok(())
}

/// Encodes and sends every event queued for one connection, in order.
async fn write_events<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    codec: C,
) {
    let connection_id = conn.id();
    while let Some(event) = rx.recv().await {
        let bytes = match codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%connection_id, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%connection_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}
