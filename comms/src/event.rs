use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::presence::UserPresence;

/// A participant has entered the room, possibly on a fresh connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterBroadcastEvent {
    /// The full presence list of the room after the join
    pub users: Vec<UserPresence>,
    /// The document snapshot handed to the joiner, keyed by the joiner's
    /// participant id. Receivers other than the joiner ignore the
    /// foreign-keyed field; for the joiner it is the only way the current
    /// document text ever reaches it.
    #[serde(flatten)]
    pub snapshot: HashMap<String, String>,
}

impl EnterBroadcastEvent {
    pub fn new(users: Vec<UserPresence>, joiner_id: &str, document: &str) -> Self {
        let mut snapshot = HashMap::with_capacity(1);
        snapshot.insert(String::from(joiner_id), String::from(document));

        EnterBroadcastEvent { users, snapshot }
    }

    /// The document text, if this event addresses the given participant
    pub fn document_for(&self, participant_id: &str) -> Option<&str> {
        self.snapshot.get(participant_id).map(String::as_str)
    }
}

/// An edit delta produced by another participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditBroadcastEvent {
    /// The opaque delta exactly as the sender produced it
    pub changes: Value,
}

/// The room's full presence list, sent after cursor updates and departures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceBroadcastEvent {
    pub users: Vec<UserPresence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "camelCase")]
/// Events that can be sent to the connections of a room.
/// Which connections receive a given event is decided by the room that
/// produced it; the payload itself carries no addressing.
pub enum Event {
    Enter(EnterBroadcastEvent),
    Message(EditBroadcastEvent),
    UpdateUser(PresenceBroadcastEvent),
}
