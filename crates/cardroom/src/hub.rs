//! Hub actor: the single Tokio task that owns every room.
//!
//! Connection tasks never touch the registry. They send commands through
//! an mpsc channel and the hub applies them one at a time, so each request
//! or disconnect runs to completion before the next one starts and room
//! events reach members in the order they were accepted.

use std::collections::HashMap;

use cardroom_protocol::{ClientEnvelope, ConnectionId, Recipient, RoomId, ServerEvent};
use cardroom_room::{Outbound, RoomRegistry};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::CardroomError;
use crate::dispatch::dispatch;
use crate::lifecycle::{on_connect, on_disconnect};

/// Channel sender for delivering events to one connection's writer task.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the hub through its channel.
pub(crate) enum HubCommand {
    /// Make a connection addressable.
    Connect {
        connection_id: ConnectionId,
        sender: ClientSender,
    },

    /// Apply a client request.
    Request {
        connection_id: ConnectionId,
        envelope: ClientEnvelope,
    },

    /// Release the connection's seat and forget its sender.
    Disconnect { connection_id: ConnectionId },

    /// Report what the hub currently holds.
    Snapshot { reply: oneshot::Sender<HubSnapshot> },
}

/// A point-in-time view of the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubSnapshot {
    /// Connections currently addressable.
    pub connections: usize,
    /// Every live room, sorted, including rooms mid-game.
    pub rooms: Vec<RoomId>,
}

/// A handle for talking to the hub.
///
/// Cheap to clone: it is just an `mpsc::Sender` wrapper.
#[derive(Clone)]
pub struct HubHandle {
    sender: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Registers `connection_id`; events addressed to it go to `sender`.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        sender: ClientSender,
    ) -> Result<(), CardroomError> {
        self.send(HubCommand::Connect {
            connection_id,
            sender,
        })
        .await
    }

    /// Queues a request. Its effects arrive on the connection's sender.
    pub async fn request(
        &self,
        connection_id: ConnectionId,
        envelope: ClientEnvelope,
    ) -> Result<(), CardroomError> {
        self.send(HubCommand::Request {
            connection_id,
            envelope,
        })
        .await
    }

    /// Queues disconnect cleanup for `connection_id`.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), CardroomError> {
        self.send(HubCommand::Disconnect { connection_id }).await
    }

    /// Waits for the hub to reach this command and report its state.
    pub async fn snapshot(&self) -> Result<HubSnapshot, CardroomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(HubCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| CardroomError::HubUnavailable)
    }

    async fn send(&self, command: HubCommand) -> Result<(), CardroomError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| CardroomError::HubUnavailable)
    }
}

/// The internal hub state. Runs inside a Tokio task.
struct Hub {
    registry: RoomRegistry,
    /// Per-connection outbound channels.
    clients: HashMap<ConnectionId, ClientSender>,
    receiver: mpsc::Receiver<HubCommand>,
}

impl Hub {
    /// Runs the actor loop until every handle is dropped.
    async fn run(mut self) {
        tracing::info!("hub started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                HubCommand::Connect {
                    connection_id,
                    sender,
                } => {
                    on_connect(connection_id);
                    self.clients.insert(connection_id, sender);
                }
                HubCommand::Request {
                    connection_id,
                    envelope,
                } => {
                    let out = dispatch(&mut self.registry, connection_id, envelope);
                    self.deliver(out);
                }
                HubCommand::Disconnect { connection_id } => {
                    self.clients.remove(&connection_id);
                    let out = on_disconnect(&mut self.registry, connection_id);
                    self.deliver(out);
                }
                HubCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
            }
        }

        tracing::info!("hub stopped");
    }

    /// Resolves recipients against the registry as it is now and hands
    /// each event to the matching writer tasks.
    fn deliver(&self, out: Vec<Outbound>) {
        for (recipient, event) in out {
            match recipient {
                Recipient::Room(room_id) => {
                    for connection_id in self.registry.members(&room_id) {
                        self.send_to(connection_id, event.clone());
                    }
                }
                Recipient::Connection(connection_id) => {
                    self.send_to(connection_id, event);
                }
            }
        }
    }

    /// Sends an event to a single connection. Silently drops it if the
    /// connection is gone.
    fn send_to(&self, connection_id: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.clients.get(&connection_id) {
            let _ = sender.send(event);
        }
    }

    fn snapshot(&self) -> HubSnapshot {
        let mut rooms = self.registry.room_ids();
        rooms.sort();
        HubSnapshot {
            connections: self.clients.len(),
            rooms,
        }
    }
}

/// Spawns the hub task around `registry` and returns a handle to it.
///
/// `channel_size` bounds the command channel; senders wait while it is
/// full.
pub fn spawn_hub(registry: RoomRegistry, channel_size: usize) -> HubHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let hub = Hub {
        registry,
        clients: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(hub.run());

    HubHandle { sender: tx }
}
