use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::presence::UserPresence;

/// Command scoping a freshly opened connection to a room.
///
/// Must be the first command on a connection; the room id is the address of
/// the connection's broadcast channel. An unknown room id creates the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachCommand {
    // The id of the room this connection belongs to.
    #[serde(rename = "r")]
    pub room: String,
}

/// Command announcing the connecting participant to its room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterCommand {
    // The participant record, cursor set to its initial position.
    #[serde(flatten)]
    pub user: UserPresence,
}

/// Command carrying one local edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditCommand {
    // Editor-specific delta payload, relayed to the other connections
    // without interpretation.
    pub changes: Value,
    // Full document text as observed by the sender after applying the edit.
    #[serde(rename = "docValue")]
    pub doc_value: String,
}

/// Command carrying a fresh cursor position (and possibly a changed
/// username or color) for the sending participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserCommand {
    #[serde(flatten)]
    pub user: UserPresence,
}

/// A protocol event sent to the server by a single editor connection.
/// After `attach`, every command is processed in the context of that room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_ct", rename_all = "camelCase")]
pub enum UserCommand {
    Attach(AttachCommand),
    Enter(EnterCommand),
    Message(EditCommand),
    UpdateUser(UpdateUserCommand),
}
