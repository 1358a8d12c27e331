//! Wire types shared by the transport, the orchestrator, and the renderer.
//!
//! Field names match the backend's JSON exactly. Beyond the envelope shapes
//! nothing is validated here; payload contents are read leniently by the
//! renderer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Role
// =============================================================================

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

// =============================================================================
// Email envelopes
// =============================================================================

/// One unread email as listed by `GET /emails/unread-today`.
///
/// Fields the client does not interpret (`date`, `threadId`, ...) are kept in
/// `extra` so they go back to the backend untouched on summarize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub snippet: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EmailSummary {
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            from: from.into(),
            snippet: None,
            extra: Map::new(),
        }
    }
}

/// Response of `GET /emails/unread-today`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnreadEmails {
    #[serde(default, deserialize_with = "lenient_emails")]
    pub emails: Option<Vec<EmailSummary>>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub error: Option<String>,
}

/// Response of `POST /emails/summarize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailDigest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "lenient_string")]
    pub reply: String,
    #[serde(default, deserialize_with = "lenient_context")]
    pub context: Option<ContextPayload>,
}

/// Response of `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub service: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// =============================================================================
// Structured context
// =============================================================================

/// The seven context tags the backend is allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextTag {
    CalendarEvents,
    FreeSlots,
    EventCreated,
    EmailList,
    EmailThread,
    EmailAttachments,
    EmailSent,
}

impl ContextTag {
    pub const ALL: [ContextTag; 7] = [
        ContextTag::CalendarEvents,
        ContextTag::FreeSlots,
        ContextTag::EventCreated,
        ContextTag::EmailList,
        ContextTag::EmailThread,
        ContextTag::EmailAttachments,
        ContextTag::EmailSent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextTag::CalendarEvents => "calendar_events",
            ContextTag::FreeSlots => "free_slots",
            ContextTag::EventCreated => "event_created",
            ContextTag::EmailList => "email_list",
            ContextTag::EmailThread => "email_thread",
            ContextTag::EmailAttachments => "email_attachments",
            ContextTag::EmailSent => "email_sent",
        }
    }

    /// Map a wire `type` value to a tag. Unknown values yield `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == value)
    }
}

impl std::fmt::Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged structured payload returned alongside a chat reply.
///
/// The tag is kept as the raw wire string so that tags this client does not
/// know survive until the renderer, which ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPayload {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl ContextPayload {
    pub fn new(tag: ContextTag, data: Value) -> Self {
        Self {
            kind: tag.as_str().to_string(),
            data,
        }
    }

    /// Build an `email_list` payload from fetched emails.
    pub fn email_list(emails: &[EmailSummary]) -> serde_json::Result<Self> {
        Ok(Self::new(ContextTag::EmailList, serde_json::to_value(emails)?))
    }

    pub fn tag(&self) -> Option<ContextTag> {
        ContextTag::from_wire(&self.kind)
    }
}

// =============================================================================
// Lenient field readers
// =============================================================================
//
// The transport does no schema checking: a field of an unexpected JSON type
// degrades to a best-effort value instead of failing the whole response.

/// Strings pass through, `null` becomes empty, anything else its JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// A non-array `emails` reads as absent; a non-object entry as an empty email.
fn lenient_emails<'de, D>(deserializer: D) -> Result<Option<Vec<EmailSummary>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    ))
}

/// Anything other than an object reads as "no context".
fn lenient_context<'de, D>(deserializer: D) -> Result<Option<ContextPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        item @ Value::Object(_) => Ok(serde_json::from_value(item).ok()),
        _ => Ok(None),
    }
}
