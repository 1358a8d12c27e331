//! Append-only record of chat turns.
//!
//! Entries get a session-unique, monotonically increasing [`MessageId`] at
//! insertion and are never mutated, reordered, or removed afterwards.

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::Serialize;

use crate::types::Role;

/// A `**...**` pair with at least one character and no nested `**` inside.
/// Single asterisks are allowed within the pair.
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*((?:[^*]|\*[^*])+?)\*\*").unwrap());

/// Identifier of a message, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// A piece of one rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Span {
    Text(String),
    Emphasis(String),
}

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Local>,
}

impl Message {
    /// Split the text on `\n` and apply the inline emphasis rule per line.
    pub fn lines(&self) -> Vec<Vec<Span>> {
        self.text.split('\n').map(parse_inline).collect()
    }
}

/// Split one line into plain and emphasized spans.
///
/// Unmatched `**` markers and stray single `*` outside a pair stay in the
/// plain text.
pub fn parse_inline(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in EMPHASIS_RE.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(Span::Text(line[cursor..whole.start()].to_string()));
        }
        spans.push(Span::Emphasis(inner.as_str().to_string()));
        cursor = whole.end();
    }

    if cursor < line.len() {
        spans.push(Span::Text(line[cursor..].to_string()));
    }

    spans
}

/// Ordered, append-only log of messages for a single session.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its identifier.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        self.entries.push(Message {
            id,
            role,
            text: text.into(),
            created_at: Local::now(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Messages appended at or after position `start`.
    pub fn since(&self, start: usize) -> &[Message] {
        self.entries.get(start..).unwrap_or(&[])
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.entries.iter().find(|m| m.id == id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }
}
