//! Routes one client request to the registry and collects what should be
//! sent back.
//!
//! The dispatcher never touches a connection. It returns
//! `(Recipient, ServerEvent)` pairs; the hub resolves room recipients to
//! connections once the whole request has been applied.

use cardroom_protocol::{
    ClientEnvelope, ClientRequest, ConnectionId, Recipient, ReplyOutcome, RoomId, ServerEvent,
};
use cardroom_room::{Outbound, RoomError, RoomRegistry};

/// Applies `envelope` on behalf of `connection_id`.
///
/// Rejected requests change nothing. When the envelope carries a
/// `request_id`, the last event returned is the `Reply` for it, except
/// for plays that were silently rejected, which never get one.
pub fn dispatch(
    registry: &mut RoomRegistry,
    connection_id: ConnectionId,
    envelope: ClientEnvelope,
) -> Vec<Outbound> {
    let ClientEnvelope {
        request_id,
        request,
    } = envelope;

    let result: Result<Option<(Option<RoomId>, Vec<Outbound>)>, RoomError> = match request {
        ClientRequest::CreateLobby { player_name } => registry
            .create_lobby(connection_id, player_name)
            .map(|(room_id, out)| Some((Some(room_id), out))),

        ClientRequest::CreateTable {
            room_id,
            player_name,
        } => registry
            .create_table(room_id.clone(), connection_id, player_name)
            .map(|out| Some((Some(room_id), out))),

        ClientRequest::JoinRoom {
            room_id,
            player_name,
        } => registry
            .join(&room_id, connection_id, player_name)
            .map(|out| Some((Some(room_id), out))),

        ClientRequest::LeaveRoom => registry
            .leave(connection_id)
            .map(|departure| Some((Some(departure.room_id), departure.outbound))),

        ClientRequest::SendMessage { room_id, message } => registry
            .chat(&room_id, connection_id, message)
            .map(|out| Some((None, out))),

        ClientRequest::StartGame { room_id } => registry
            .start_game(&room_id)
            .map(|out| Some((None, out))),

        ClientRequest::PlayCard { room_id, card } => {
            match registry.play_card(&room_id, connection_id, card) {
                Ok((outcome, out)) if outcome.is_accepted() => Ok(Some((None, out))),
                Ok(_) => Ok(None),
                Err(e) => {
                    tracing::debug!(%connection_id, error = %e, "play in vanished room ignored");
                    Ok(None)
                }
            }
        }

        ClientRequest::ListRooms => Ok(Some((
            None,
            vec![(
                Recipient::Connection(connection_id),
                ServerEvent::RoomList {
                    rooms: registry.list_rooms(),
                },
            )],
        ))),
    };

    let (mut out, outcome) = match result {
        Ok(Some((room_id, out))) => (out, Some(ReplyOutcome::Ok { room_id })),
        Ok(None) => (Vec::new(), None),
        Err(e) => {
            tracing::debug!(%connection_id, error = %e, "request refused");
            (
                Vec::new(),
                Some(ReplyOutcome::Error {
                    code: e.code(),
                    message: e.to_string(),
                }),
            )
        }
    };

    if let (Some(request_id), Some(outcome)) = (request_id, outcome) {
        out.push((
            Recipient::Connection(connection_id),
            ServerEvent::Reply {
                request_id,
                outcome,
            },
        ));
    }
    out
}
