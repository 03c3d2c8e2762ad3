use comms::event::Event;

/// Which of a room's connections should act on a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every connection attached to the room, the originator included
    Everyone,
    /// Every connection except the one the triggering event arrived on
    Others,
}

#[derive(Debug, Clone)]
/// One fan-out unit cloned to every subscriber of a room's broadcast channel.
///
/// The broadcast channel cannot exclude a receiver, so the originating
/// connection id travels with the event and every session applies the
/// audience filter to its own copy.
pub struct RoomBroadcast {
    /// Connection id the triggering protocol event arrived on
    pub origin: String,
    pub audience: Audience,
    pub event: Event,
}

impl RoomBroadcast {
    pub fn is_visible_to(&self, connection_id: &str) -> bool {
        match self.audience {
            Audience::Everyone => true,
            Audience::Others => self.origin != connection_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use comms::event::{EditBroadcastEvent, Event};
    use serde_json::json;

    use super::*;

    fn broadcast(audience: Audience) -> RoomBroadcast {
        RoomBroadcast {
            origin: "conn-a".to_string(),
            audience,
            event: Event::Message(EditBroadcastEvent {
                changes: json!(null),
            }),
        }
    }

    #[test]
    fn everyone_includes_the_originator() {
        let broadcast = broadcast(Audience::Everyone);

        assert!(broadcast.is_visible_to("conn-a"));
        assert!(broadcast.is_visible_to("conn-b"));
    }

    #[test]
    fn others_excludes_only_the_originator() {
        let broadcast = broadcast(Audience::Others);

        assert!(!broadcast.is_visible_to("conn-a"));
        assert!(broadcast.is_visible_to("conn-b"));
    }
}
