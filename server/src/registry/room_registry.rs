use std::{collections::HashMap, sync::Arc};

use comms::directory::RoomSnapshot;
use tokio::sync::Mutex;

use super::room::RoomState;

#[derive(Debug, Default)]
/// Process-wide table of rooms. Constructed once in `main` and shared with
/// every session task as an `Arc`; rooms are created on demand and live until
/// the process exits, there is no deletion path.
///
/// The outer lock only guards the id-to-room table; per-room state sits
/// behind each room's own mutex, so traffic in one room never contends with
/// another room's.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, Arc<Mutex<RoomState>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        RoomRegistry {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Directory-driven creation. Idempotent: an existing room keeps its
    /// document and presence untouched and the call still succeeds.
    pub async fn create_room(&self, id: &str, name: &str) -> Arc<Mutex<RoomState>> {
        let mut rooms = self.rooms.lock().await;

        Arc::clone(
            rooms
                .entry(String::from(id))
                .or_insert_with(|| Arc::new(Mutex::new(RoomState::new(id, name)))),
        )
    }

    /// Lookup without side effects, for the directory collaborator.
    pub async fn get_room(&self, id: &str) -> Option<Arc<Mutex<RoomState>>> {
        self.rooms.lock().await.get(id).cloned()
    }

    /// Resolve the room a connection is attaching to. An unseen room id
    /// creates the room, named after its id; this is the canonical lazy
    /// creation point for connections that skipped the directory.
    pub async fn attach(&self, id: &str) -> Arc<Mutex<RoomState>> {
        self.create_room(id, id).await
    }

    /// Snapshot every room for the directory listing.
    pub async fn list_rooms(&self) -> HashMap<String, RoomSnapshot> {
        // Collect the handles first so the table lock is not held across
        // the per-room locks
        let rooms = self
            .rooms
            .lock()
            .await
            .iter()
            .map(|(id, room)| (id.clone(), Arc::clone(room)))
            .collect::<Vec<_>>();

        let mut snapshots = HashMap::with_capacity(rooms.len());
        for (id, room) in rooms {
            snapshots.insert(id, room.lock().await.snapshot());
        }

        snapshots
    }

    /// Snapshot a single room for the directory detail view.
    pub async fn room_info(&self, id: &str) -> Option<RoomSnapshot> {
        let room = self.get_room(id).await?;
        let snapshot = room.lock().await.snapshot();

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use comms::presence::{CursorPosition, UserPresence};
    use serde_json::json;

    use super::*;

    fn test_user(id: &str) -> UserPresence {
        UserPresence {
            id: String::from(id),
            username: format!("user-{}", id),
            color: "#D77829".to_string(),
            pos: CursorPosition { line: 0, ch: 0 },
        }
    }

    #[tokio::test]
    async fn create_room_is_idempotent_and_preserves_state() {
        let registry = RoomRegistry::new();

        let room = registry.create_room("r1", "room one").await;
        {
            let mut room = room.lock().await;
            room.enter("conn-a", test_user("u1"));
            room.apply_edit("conn-a", json!({"text":["X"]}), "X".to_string());
        }

        let same_room = registry.create_room("r1", "renamed").await;
        let same_room = same_room.lock().await;
        assert_eq!(same_room.document(), "X");
        assert_eq!(same_room.participants().len(), 1);
    }

    #[tokio::test]
    async fn attach_lazily_creates_unknown_rooms() {
        let registry = RoomRegistry::new();
        assert!(registry.get_room("r1").await.is_none());

        let room = registry.attach("r1").await;
        assert_eq!(room.lock().await.id(), "r1");
        assert!(registry.get_room("r1").await.is_some());
    }

    #[tokio::test]
    async fn room_info_is_none_for_unknown_rooms() {
        let registry = RoomRegistry::new();

        assert!(registry.room_info("nope").await.is_none());
    }

    #[tokio::test]
    async fn list_rooms_snapshots_every_room() {
        let registry = RoomRegistry::new();
        registry.create_room("r1", "room one").await;

        let room = registry.attach("r2").await;
        room.lock()
            .await
            .apply_edit("conn-a", json!(null), "two".to_string());

        let listing = registry.list_rooms().await;
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.get("r1").unwrap().name, "room one");
        assert_eq!(listing.get("r2").unwrap().doc_value, "two");
    }
}
