//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::{ChatEntry, ServerMessage};
use hiroba_shared::time::timestamp_to_rfc3339;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render any server frame
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded server frame
    /// * `me` - The local username, marked with "(me)" in user lists
    /// * `received_at` - Unix timestamp when the frame arrived (milliseconds)
    pub fn format_server_message(message: &ServerMessage, me: &str, received_at: i64) -> String {
        match message {
            ServerMessage::SelfJoined(p) => Self::format_self_joined(&p.room_id, &p.username),
            ServerMessage::Joined(p) => Self::format_user_joined(&p.username, received_at),
            ServerMessage::Left(p) => Self::format_user_left(&p.username, received_at),
            ServerMessage::Users(p) => Self::format_users(&p.users, me),
            ServerMessage::ChatHistory(p) => Self::format_chat_history(&p.messages),
            ServerMessage::ChatNew(entry) => Self::format_chat_message(entry, received_at),
        }
    }

    pub fn format_self_joined(room_id: &str, username: &str) -> String {
        format!(
            "\n\n{}\nJoined room '{}' as {}\n{}\n",
            RULE, room_id, username, RULE
        )
    }

    pub fn format_user_joined(username: &str, at: i64) -> String {
        format!("\n+ {} joined at {}\n", username, timestamp_to_rfc3339(at))
    }

    pub fn format_user_left(username: &str, at: i64) -> String {
        format!("\n- {} left at {}\n", username, timestamp_to_rfc3339(at))
    }

    /// Format the online user list, marking the local user
    pub fn format_users(users: &[String], me: &str) -> String {
        let names: Vec<String> = users
            .iter()
            .map(|name| {
                if name == me {
                    format!("{} (me)", name)
                } else {
                    name.clone()
                }
            })
            .collect();
        format!("\nOnline ({}): {}\n", users.len(), names.join(", "))
    }

    /// Format the backlog sent right after joining
    pub fn format_chat_history(messages: &[ChatEntry]) -> String {
        let mut output = String::new();
        output.push_str("\nHistory:\n");

        if messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for entry in messages {
                output.push_str(&format!("@{}: {}\n", entry.from, entry.message));
            }
        }

        output.push_str(THIN_RULE);
        output.push('\n');
        output
    }

    /// Format a live chat message
    pub fn format_chat_message(entry: &ChatEntry, received_at: i64) -> String {
        format!(
            "\n\n{}\n@{}: {}\nreceived at {}\n{}\n",
            THIN_RULE,
            entry.from,
            entry.message,
            timestamp_to_rfc3339(received_at),
            THIN_RULE
        )
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("sent at {}\n", timestamp_to_rfc3339(sent_at))
    }

    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  /join <room>  leave the current room and join another",
            "  /exit         leave the current room",
            "  /quit         disconnect (or press Ctrl+D)",
            "  /help         show this list",
            "Anything else is sent as a chat message.",
            "",
        ]
        .join("\n")
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
