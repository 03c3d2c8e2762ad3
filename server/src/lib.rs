/// The room table and the per-room synchronization state. The registry's
/// snapshot reads are the data source for the room-directory HTTP
/// collaborator, which lives outside this crate.
pub mod registry;
/// Per-connection session handling: the gateway between a client's TCP
/// stream and its room.
pub mod session;
