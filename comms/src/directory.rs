use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::presence::UserPresence;

/// The request succeeded
pub const CODE_OK: i32 = 0;
/// A required query field was missing
pub const CODE_MISSING_FIELD: i32 = -1;
/// The requested room id is unknown
pub const CODE_UNKNOWN_ROOM: i32 = 1;

/// Point-in-time copy of one room's state, served by the directory endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Human-readable room name
    pub name: String,
    /// Current participants, keyed by participant id
    pub users: HashMap<String, UserPresence>,
    /// Current full text of the shared document
    pub doc_value: String,
}

/// The `{code, message, data}` envelope returned by the directory
/// collaborator. The synchronization core only produces the payloads; how
/// they travel over HTTP is the collaborator's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryResponse<T> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> DirectoryResponse<T> {
    pub fn ok(data: T) -> Self {
        DirectoryResponse {
            code: CODE_OK,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(message: &str) -> Self {
        DirectoryResponse {
            code: CODE_OK,
            message: Some(String::from(message)),
            data: None,
        }
    }

    pub fn err(code: i32, message: &str) -> Self {
        DirectoryResponse {
            code,
            message: Some(String::from(message)),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_serialization() {
        let response = DirectoryResponse::ok(RoomSnapshot {
            name: "r1".to_string(),
            users: HashMap::new(),
            doc_value: "hello".to_string(),
        });

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"code":0,"data":{"name":"r1","users":{},"docValue":"hello"}}"#
        );
    }

    #[test]
    fn test_err_response_serialization() {
        let response: DirectoryResponse<RoomSnapshot> =
            DirectoryResponse::err(CODE_MISSING_FIELD, "room id is required");

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"code":-1,"message":"room id is required"}"#
        );
    }

    #[test]
    fn test_err_response_missing_fields_deserialize_to_none() {
        let response: DirectoryResponse<RoomSnapshot> =
            serde_json::from_str(r#"{"code":1,"message":"unknown room"}"#).unwrap();

        assert_eq!(response.code, CODE_UNKNOWN_ROOM);
        assert_eq!(response.data, None);
    }
}
