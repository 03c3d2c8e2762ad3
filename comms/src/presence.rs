use serde::{Deserialize, Serialize};

/// A position inside the shared document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    /// Zero-based line index
    pub line: usize,
    /// Zero-based character offset within the line
    pub ch: usize,
}

/// One participant of a room, as known to the server and to every client
///
/// Identity is logical, not transport-bound: the same `id` may reconnect
/// under a new connection and keeps its single presence entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPresence {
    /// Stable identity of the participant, supplied by the client
    pub id: String,
    /// Display label
    pub username: String,
    /// Display color; stored exactly as the client supplied it, the server
    /// never assigns one
    pub color: String,
    /// Last reported cursor position in the shared document
    pub pos: CursorPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_presence_serialization() {
        let user = UserPresence {
            id: "u1".to_string(),
            username: "ada".to_string(),
            color: "#549EF9".to_string(),
            pos: CursorPosition { line: 2, ch: 7 },
        };

        let serialized = serde_json::to_string(&user).unwrap();
        assert_eq!(
            serialized,
            r##"{"id":"u1","username":"ada","color":"#549EF9","pos":{"line":2,"ch":7}}"##
        );

        let deserialized: UserPresence = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, user);
    }
}
