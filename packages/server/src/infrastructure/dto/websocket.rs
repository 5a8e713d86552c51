//! WebSocket message DTOs.
//!
//! Every frame is a JSON envelope `{"type": ..., "payload": {...}}`.

use serde::{Deserialize, Serialize};

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    Join(JoinPayload),
    Chat(ChatPayload),
    Exit(ExitPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub room_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub message: String,
}

/// Both fields are informational. The server uses its own record of the
/// connection's room and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    SelfJoined(PresencePayload),
    Joined(PresencePayload),
    Left(PresencePayload),
    Users(UsersPayload),
    ChatHistory(ChatHistoryPayload),
    ChatNew(ChatEntry),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresencePayload {
    pub room_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersPayload {
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryPayload {
    pub messages: Vec<ChatEntry>,
}

/// One chat message as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub from: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_wire_format() {
        // テスト項目: サーバーメッセージが {type, payload} 形式でシリアライズされる
        // given (前提条件):
        let msg = ServerMessage::SelfJoined(PresencePayload {
            room_id: "R1".to_string(),
            username: "alice".to_string(),
        });

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "self-joined", "payload": {"roomId": "R1", "username": "alice"}})
        );
    }

    #[test]
    fn test_chat_history_wire_format() {
        // テスト項目: chat-history の type 名と payload が正しい
        // given (前提条件):
        let msg = ServerMessage::ChatHistory(ChatHistoryPayload {
            messages: vec![ChatEntry {
                from: "alice".to_string(),
                message: "hi".to_string(),
            }],
        });

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "chat-history", "payload": {"messages": [{"from": "alice", "message": "hi"}]}})
        );
    }

    #[test]
    fn test_exit_without_fields_serializes_empty_payload() {
        // テスト項目: フィールドなしの exit は空の payload になる
        // given (前提条件):
        let msg = ClientMessage::Exit(ExitPayload::default());

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(value, json!({"type": "exit", "payload": {}}));
    }
}
