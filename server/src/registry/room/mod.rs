pub use self::broadcast::{Audience, RoomBroadcast};
pub use self::room_state::RoomState;

mod broadcast;
mod room_state;
