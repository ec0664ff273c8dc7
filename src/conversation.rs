//! Grouping of flat message lists into two-party conversations.
//!
//! Every messaging screen goes through this module: the list screen groups and
//! summarises, the detail screen orders one conversation and annotates each
//! message with the flags the renderer needs. Results are rebuilt on every
//! fetch and never cached.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::api::models::{Message, UserId};

/// Identity of a conversation: the unordered pair of its participants,
/// stored as `(min, max)` and written `"<min>-<max>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationKey {
    low: UserId,
    high: UserId,
}

impl ConversationKey {
    pub fn new(a: UserId, b: UserId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn of(message: &Message) -> Self {
        Self::new(message.sender_id, message.receiver_id)
    }

    /// The participant that is not `user`, or `None` when `user` is not part
    /// of this conversation.
    pub fn other_than(&self, user: UserId) -> Option<UserId> {
        if user == self.low {
            Some(self.high)
        } else if user == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid conversation id `{0}`, expected `<user id>-<user id>`")]
pub struct ParseKeyError(String);

impl FromStr for ConversationKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());
        // A leading '-' belongs to the first id, so split after it.
        let split_at = s
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i)
            .ok_or_else(err)?;
        let a = s[..split_at].trim().parse().map_err(|_| err())?;
        let b = s[split_at + 1..].trim().parse().map_err(|_| err())?;
        Ok(Self::new(a, b))
    }
}

/// A message annotated for rendering inside one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    pub message: Message,
    pub is_current_user: bool,
    /// Set on the first message of each run of consecutive messages from the
    /// same sender.
    pub is_first_in_block: bool,
}

/// Partitions `messages` by unordered participant pair. Each bucket keeps the
/// input encounter order.
pub fn group_by_conversation(messages: &[Message]) -> BTreeMap<ConversationKey, Vec<Message>> {
    let mut grouped: BTreeMap<ConversationKey, Vec<Message>> = BTreeMap::new();
    for message in messages {
        grouped
            .entry(ConversationKey::of(message))
            .or_default()
            .push(message.clone());
    }
    grouped
}

/// Sorts one conversation chronologically and derives the display flags.
///
/// The sort is stable, so messages with identical timestamps keep their
/// relative input order.
pub fn order_conversation(
    messages: &[Message],
    current_user: Option<UserId>,
) -> Vec<DisplayMessage> {
    let mut sorted: Vec<&Message> = messages.iter().collect();
    sorted.sort_by_key(|m| m.created_at);

    let mut previous_sender = None;
    sorted
        .into_iter()
        .map(|m| {
            let is_first_in_block = previous_sender != Some(m.sender_id);
            previous_sender = Some(m.sender_id);
            DisplayMessage {
                message: m.clone(),
                is_current_user: current_user == Some(m.sender_id),
                is_first_in_block,
            }
        })
        .collect()
}

/// One row of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub key: ConversationKey,
    pub other_user: UserId,
    pub message_count: usize,
    pub last_at: DateTime<Utc>,
    pub last_content: String,
}

/// Builds list rows, most recently active conversation first.
pub fn summarize(
    grouped: &BTreeMap<ConversationKey, Vec<Message>>,
    current_user: Option<UserId>,
) -> Vec<ConversationSummary> {
    let mut rows: Vec<ConversationSummary> = grouped
        .iter()
        .filter_map(|(key, bucket)| {
            let first = bucket.first()?;
            // Latest wins; on equal timestamps the later-encountered message.
            let last = bucket.iter().fold(first, |acc, m| {
                if m.created_at >= acc.created_at {
                    m
                } else {
                    acc
                }
            });
            let other_user = current_user
                .and_then(|me| key.other_than(me))
                .unwrap_or(if Some(first.sender_id) == current_user {
                    first.receiver_id
                } else {
                    first.sender_id
                });
            Some(ConversationSummary {
                key: *key,
                other_user,
                message_count: bucket.len(),
                last_at: last.created_at,
                last_content: last.content.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.last_at.cmp(&a.last_at).then(a.key.cmp(&b.key)));
    rows
}

/// Who a reply typed into conversation `key` goes to.
pub fn reply_target(key: ConversationKey, current_user: UserId) -> Option<UserId> {
    key.other_than(current_user)
}
