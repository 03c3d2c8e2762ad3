use std::collections::HashMap;

use comms::{
    directory::RoomSnapshot,
    event::{EditBroadcastEvent, EnterBroadcastEvent, Event, PresenceBroadcastEvent},
    presence::UserPresence,
};
use serde_json::Value;
use tokio::sync::broadcast;

use super::{Audience, RoomBroadcast};

const BROADCAST_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug)]
/// [RoomState] owns one room's shared document, its presence table and the
/// mapping from live connection to participant identity.
///
/// All mutation goes through the four protocol operations below; the gateway
/// calls them under the room's mutex, so within one room they are totally
/// ordered and never interleave. Each operation fires at most one broadcast
/// on the room's channel.
pub struct RoomState {
    id: String,
    name: String,
    document: String,
    presence: HashMap<String, UserPresence>,
    connections: HashMap<String, String>,
    broadcast_tx: broadcast::Sender<RoomBroadcast>,
}

impl RoomState {
    pub fn new(id: &str, name: &str) -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);

        RoomState {
            id: String::from(id),
            name: String::from(name),
            document: String::new(),
            presence: HashMap::new(),
            connections: HashMap::new(),
            broadcast_tx,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Subscribe to the room's fan-out channel. A session must subscribe
    /// before dispatching its `enter` so it observes its own join broadcast,
    /// which carries the document snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomBroadcast> {
        self.broadcast_tx.subscribe()
    }

    /// A participant announces itself on a connection.
    ///
    /// Re-entering with a known participant id keeps the stored entry, never
    /// duplicates it. The connection mapping is always refreshed so a
    /// reconnect routes its eventual disconnect to the right participant.
    /// Broadcasts the presence list plus the joiner-keyed document snapshot
    /// to every connection; only the joiner reads the snapshot field.
    pub fn enter(&mut self, connection_id: &str, user: UserPresence) {
        let user_id = user.id.clone();

        self.presence.entry(user_id.clone()).or_insert(user);
        self.connections
            .insert(String::from(connection_id), user_id.clone());

        self.broadcast(
            connection_id,
            Audience::Everyone,
            Event::Enter(EnterBroadcastEvent::new(
                self.participants(),
                &user_id,
                &self.document,
            )),
        );
    }

    /// Accept one edit from a connection.
    ///
    /// The sender's resulting text overwrites the document unconditionally;
    /// concurrent edits are not merged or rejected, the last one processed
    /// wins. The opaque delta is relayed to every other connection, which
    /// may therefore apply it against a text it no longer matches.
    pub fn apply_edit(&mut self, connection_id: &str, changes: Value, doc_value: String) {
        self.document = doc_value;

        self.broadcast(
            connection_id,
            Audience::Others,
            Event::Message(EditBroadcastEvent { changes }),
        );
    }

    /// Replace the participant's presence entry wholesale and echo the full
    /// list to every connection, the sender included. The sender reconciles
    /// its own echo on the client side.
    pub fn update_cursor(&mut self, connection_id: &str, user: UserPresence) {
        self.presence.insert(user.id.clone(), user);

        self.broadcast(
            connection_id,
            Audience::Everyone,
            Event::UpdateUser(PresenceBroadcastEvent {
                users: self.participants(),
            }),
        );
    }

    /// Detach a connection: remove its connection mapping and the mapped
    /// participant's presence entry, then tell the remaining connections.
    ///
    /// A connection that never entered, or a duplicate disconnect for one
    /// that already left, is a complete no-op.
    pub fn leave(&mut self, connection_id: &str) {
        let Some(user_id) = self.connections.remove(connection_id) else {
            return;
        };

        self.presence.remove(&user_id);

        self.broadcast(
            connection_id,
            Audience::Everyone,
            Event::UpdateUser(PresenceBroadcastEvent {
                users: self.participants(),
            }),
        );
    }

    pub fn participants(&self) -> Vec<UserPresence> {
        self.presence.values().cloned().collect()
    }

    /// Point-in-time copy for the directory collaborator. The connection
    /// mapping is transport-internal and stays out of it.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            name: self.name.clone(),
            users: self.presence.clone(),
            doc_value: self.document.clone(),
        }
    }

    fn broadcast(&self, origin: &str, audience: Audience, event: Event) {
        // Fire-and-forget: a room with no subscribed connections is fine
        let _ = self.broadcast_tx.send(RoomBroadcast {
            origin: String::from(origin),
            audience,
            event,
        });
    }
}
