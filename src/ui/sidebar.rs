use std::collections::HashMap;
use std::fmt::Write;

use crate::api::models::UserId;
use crate::conversation::ConversationSummary;
use crate::storage::CachedUser;

pub const UNKNOWN_USER: &str = "Unknown user";

pub fn display_name(users: &HashMap<UserId, CachedUser>, id: UserId) -> &str {
    users.get(&id).map(|u| u.name.as_str()).unwrap_or(UNKNOWN_USER)
}

/// Conversation list: one row per conversation with the other party's name,
/// the message count and a preview of the latest message.
pub fn render_conversations(
    rows: &[ConversationSummary],
    users: &HashMap<UserId, CachedUser>,
) -> String {
    let mut out = String::from("Conversations\n");
    if rows.is_empty() {
        out.push_str("  (no messages yet)\n");
        return out;
    }
    for row in rows {
        let _ = writeln!(
            out,
            "  [{}] {} - {} message{}",
            row.key,
            display_name(users, row.other_user),
            row.message_count,
            if row.message_count == 1 { "" } else { "s" }
        );
        let _ = writeln!(out, "      {}", preview(&row.last_content, 48));
    }
    out
}

/// First non-blank line, cut to `max_chars`. The ellipsis marks a cut line or
/// further non-blank lines after it.
fn preview(content: &str, max_chars: usize) -> String {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
    let Some(line) = lines.next() else {
        return String::new();
    };
    let cut = line.chars().count() > max_chars;
    let shown: String = line.chars().take(max_chars).collect();
    if cut || lines.next().is_some() {
        format!("{}…", shown)
    } else {
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::UserType;
    use crate::conversation::ConversationKey;

    fn row(a: UserId, b: UserId, other: UserId, count: usize, last: &str) -> ConversationSummary {
        ConversationSummary {
            key: ConversationKey::new(a, b),
            other_user: other,
            message_count: count,
            last_at: "2024-01-01T10:00:00Z".parse().unwrap(),
            last_content: last.to_string(),
        }
    }

    #[test]
    fn rows_use_cached_names_and_fall_back() {
        let mut users = HashMap::new();
        users.insert(
            2,
            CachedUser {
                id: 2,
                name: "Kotonoha Inc.".into(),
                user_type: UserType::Company,
                icon_url: None,
            },
        );
        let rows = [row(1, 2, 2, 3, "See you"), row(1, 5, 5, 1, "hello")];
        let out = render_conversations(&rows, &users);
        assert!(out.contains("[1-2] Kotonoha Inc. - 3 messages"));
        assert!(out.contains("[1-5] Unknown user - 1 message\n"));
        assert!(out.contains("      See you"));
    }

    #[test]
    fn empty_list_says_so() {
        assert!(render_conversations(&[], &HashMap::new()).contains("no messages yet"));
    }

    #[test]
    fn previews_are_single_line() {
        assert_eq!(preview("first\nsecond", 48), "first…");
        assert_eq!(preview("abcdef", 3), "abc…");
        assert_eq!(preview("short", 48), "short");
        assert_eq!(preview("\nhello", 48), "hello");
        assert_eq!(preview("hi\n", 48), "hi");
        assert_eq!(preview("hi\n\n   \n", 48), "hi");
        assert_eq!(preview("  \n  padded  \nmore", 48), "padded…");
        assert_eq!(preview("\n \n", 48), "");
    }
}
