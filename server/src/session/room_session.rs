use std::sync::Arc;

use comms::{command::UserCommand, event::Event};
use tokio::sync::{broadcast, Mutex};

use crate::registry::{RoomBroadcast, RoomState};

/// [RoomSession] binds one connection to one room: it dispatches inbound
/// protocol events to the room's operations and narrows the room's broadcast
/// feed down to what this connection should see.
///
/// It holds no state of its own beyond the connection-to-room binding.
pub(super) struct RoomSession {
    connection_id: String,
    room: Arc<Mutex<RoomState>>,
    broadcast_rx: broadcast::Receiver<RoomBroadcast>,
}

impl RoomSession {
    pub async fn new(connection_id: &str, room: Arc<Mutex<RoomState>>) -> Self {
        // Subscribe before any command is processed, so this connection
        // observes its own enter broadcast carrying the document snapshot
        let broadcast_rx = room.lock().await.subscribe();

        RoomSession {
            connection_id: String::from(connection_id),
            room,
            broadcast_rx,
        }
    }

    /// Dispatch one inbound protocol event to the room. Locking the room's
    /// mutex is what serializes this room's operations across sessions.
    pub async fn handle_command(&mut self, cmd: UserCommand) -> anyhow::Result<()> {
        match cmd {
            UserCommand::Attach(_) => {
                return Err(anyhow::anyhow!("connection is already attached to a room"));
            }
            UserCommand::Enter(cmd) => {
                self.room.lock().await.enter(&self.connection_id, cmd.user);
            }
            UserCommand::Message(cmd) => {
                self.room
                    .lock()
                    .await
                    .apply_edit(&self.connection_id, cmd.changes, cmd.doc_value);
            }
            UserCommand::UpdateUser(cmd) => {
                self.room
                    .lock()
                    .await
                    .update_cursor(&self.connection_id, cmd.user);
            }
        }

        Ok(())
    }

    /// Remove this connection's presence entry and tell the remaining
    /// connections. Safe to call for a connection that never entered.
    pub async fn leave(&mut self) {
        self.room.lock().await.leave(&self.connection_id);
    }

    /// Receive the next broadcast addressed to this connection.
    pub async fn recv(&mut self) -> anyhow::Result<Event> {
        loop {
            match self.broadcast_rx.recv().await {
                Ok(broadcast) if broadcast.is_visible_to(&self.connection_id) => {
                    return Ok(broadcast.event);
                }
                // Either this connection originated an others-only broadcast,
                // or the receiver lagged and skipped old envelopes
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(anyhow::anyhow!("room broadcast channel closed"));
                }
            }
        }
    }
}
