/// Set of protocol events which the server can receive from an editor connection
pub mod command;
/// Data types exchanged with the room-directory HTTP collaborator
pub mod directory;
/// Set of events broadcast by the server to the connections of a room
pub mod event;
/// Participant record shared by commands, events and directory snapshots
pub mod presence;
/// Implementation of event and command transportation over TCP Streams.
/// Requires 'server' or 'client' features to be enabled and will bring in tokio dependency alongside with other dependencies
pub mod transport;
