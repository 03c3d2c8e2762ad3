pub use self::room::{Audience, RoomBroadcast, RoomState};
pub use self::room_registry::RoomRegistry;

mod room;
mod room_registry;
