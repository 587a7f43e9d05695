//! Connection lifecycle: what happens to rooms when a connection comes and
//! goes.

use cardroom_protocol::ConnectionId;
use cardroom_room::{Outbound, RoomRegistry};

/// A new connection needs no room state; it only has to be addressable,
/// which the hub takes care of.
pub fn on_connect(connection_id: ConnectionId) {
    tracing::debug!(%connection_id, "connection registered");
}

/// Removes `connection_id` from whichever room holds it.
///
/// Returns the membership update for the players left behind, or nothing
/// if the connection was not seated or its room is now gone.
pub fn on_disconnect(registry: &mut RoomRegistry, connection_id: ConnectionId) -> Vec<Outbound> {
    match registry.remove_player_everywhere(connection_id) {
        Some(departure) => {
            tracing::info!(
                %connection_id,
                room_id = %departure.room_id,
                remaining = departure.remaining.len(),
                room_removed = departure.room_removed,
                "seat released on disconnect"
            );
            departure.outbound
        }
        None => Vec::new(),
    }
}
