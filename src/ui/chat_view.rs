use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Local, Utc};

use crate::api::models::UserId;
use crate::conversation::{ConversationKey, DisplayMessage};
use crate::storage::CachedUser;
use crate::ui::sidebar::display_name;

pub const SELF_LABEL: &str = "You";

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Renders one ordered conversation. The sender label is printed only on the
/// first message of each block; own messages are indented to the right.
pub fn render_conversation(
    key: ConversationKey,
    messages: &[DisplayMessage],
    users: &HashMap<UserId, CachedUser>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Conversation {}", key);
    if messages.is_empty() {
        out.push_str("  (empty)\n");
        return out;
    }
    for dm in messages {
        let indent = if dm.is_current_user { "            " } else { "  " };
        if dm.is_first_in_block {
            let label = if dm.is_current_user {
                SELF_LABEL
            } else {
                display_name(users, dm.message.sender_id)
            };
            let _ = writeln!(out, "{}{}:", indent, label);
        }
        let mut lines = dm.message.content.lines().peekable();
        if lines.peek().is_none() {
            let _ = writeln!(out, "{}  ", indent);
        }
        for line in lines {
            let _ = writeln!(out, "{}  {}", indent, line);
        }
        let _ = writeln!(out, "{}  ({})", indent, local_time(dm.message.created_at));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Message;
    use crate::conversation::order_conversation;

    fn msg(id: i64, sender: UserId, content: &str, at: &str) -> Message {
        Message {
            id,
            sender_id: sender,
            receiver_id: if sender == 1 { 2 } else { 1 },
            content: content.to_string(),
            created_at: at.parse().unwrap(),
        }
    }

    #[test]
    fn labels_appear_once_per_block() {
        let messages = vec![
            msg(1, 2, "Hello", "2024-01-01T09:00:00Z"),
            msg(2, 2, "Are you there?", "2024-01-01T09:01:00Z"),
            msg(3, 1, "Yes", "2024-01-01T09:02:00Z"),
        ];
        let ordered = order_conversation(&messages, Some(1));
        let out = render_conversation(ConversationKey::new(1, 2), &ordered, &HashMap::new());

        assert!(out.starts_with("Conversation 1-2\n"));
        assert_eq!(out.matches("Unknown user:").count(), 1);
        assert_eq!(out.matches("You:").count(), 1);
        assert!(out.contains("            You:\n"));
        assert!(out.contains("    Are you there?\n"));
    }

    #[test]
    fn empty_message_keeps_a_body_line() {
        let ordered = order_conversation(&[msg(1, 2, "", "2024-01-01T09:00:00Z")], None);
        let out = render_conversation(ConversationKey::new(1, 2), &ordered, &HashMap::new());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "  Unknown user:");
        assert_eq!(lines[2], "    ");
        assert!(lines[3].starts_with("    ("));
    }
}
