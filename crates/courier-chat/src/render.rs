//! Context renderer: structured payload -> display model.
//!
//! [`render_context`] is pure and total. Every payload field is optional and
//! a missing or mistyped field reads as empty, so no payload can make
//! rendering fail. Unrecognized tags render nothing.

use serde_json::Value;

use crate::types::{ContextPayload, ContextTag};

/// Shown when no payload has been received yet.
pub const PROMPT_TEXT: &str = "Ask about your inbox or calendar and details will show up here.";
pub const NO_EVENTS_TEXT: &str = "No events scheduled.";
pub const NO_AVAILABILITY_TEXT: &str = "No availability data.";
pub const NO_UNREAD_TEXT: &str = "No unread emails.";
pub const UNTITLED_EVENT: &str = "(no title)";
pub const ELLIPSIS: &str = "...";

/// Thread bodies are cut to this many characters.
pub const THREAD_BODY_LIMIT: usize = 300;
/// Attachment previews are cut to this many characters.
pub const ATTACHMENT_PREVIEW_LIMIT: usize = 500;
/// Status value meaning the backend delivered the email.
pub const DELIVERED_STATUS: &str = "sent";

// =============================================================================
// Display model
// =============================================================================

/// What the context panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextView {
    /// No payload yet.
    Prompt,
    /// Payload with a tag this client does not know.
    Hidden,
    CalendarEvents(CalendarView),
    FreeSlots(AvailabilityView),
    EventCreated(EventConfirmation),
    EmailList(InboxView),
    EmailThread(ThreadView),
    EmailAttachments(AttachmentsView),
    EmailSent(SentConfirmation),
}

impl ContextView {
    /// The payload tag this view was rendered from.
    pub fn tag(&self) -> Option<ContextTag> {
        match self {
            ContextView::Prompt | ContextView::Hidden => None,
            ContextView::CalendarEvents(_) => Some(ContextTag::CalendarEvents),
            ContextView::FreeSlots(_) => Some(ContextTag::FreeSlots),
            ContextView::EventCreated(_) => Some(ContextTag::EventCreated),
            ContextView::EmailList(_) => Some(ContextTag::EmailList),
            ContextView::EmailThread(_) => Some(ContextTag::EmailThread),
            ContextView::EmailAttachments(_) => Some(ContextTag::EmailAttachments),
            ContextView::EmailSent(_) => Some(ContextTag::EmailSent),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, ContextView::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub events: Vec<EventCard>,
}

impl CalendarView {
    pub fn notice(&self) -> Option<&'static str> {
        self.events.is_empty().then_some(NO_EVENTS_TEXT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventCard {
    pub title: String,
    pub start: String,
    pub end: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityView {
    pub date: Option<String>,
    pub busy: Vec<SlotRow>,
    pub free: Vec<SlotRow>,
}

impl AvailabilityView {
    /// Busy section, present only when non-empty.
    pub fn busy_section(&self) -> Option<&[SlotRow]> {
        (!self.busy.is_empty()).then_some(self.busy.as_slice())
    }

    /// Free section, present only when non-empty.
    pub fn free_section(&self) -> Option<&[SlotRow]> {
        (!self.free.is_empty()).then_some(self.free.as_slice())
    }

    pub fn notice(&self) -> Option<&'static str> {
        (self.busy.is_empty() && self.free.is_empty()).then_some(NO_AVAILABILITY_TEXT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotRow {
    pub start: String,
    pub end: String,
    /// Event occupying a busy slot.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventConfirmation {
    pub title: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub attendees: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InboxView {
    pub emails: Vec<EmailRow>,
}

impl InboxView {
    pub fn notice(&self) -> Option<&'static str> {
        self.emails.is_empty().then_some(NO_UNREAD_TEXT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailRow {
    pub avatar: String,
    pub sender: String,
    pub subject: String,
    pub snippet: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadView {
    pub subject: Option<String>,
    pub entries: Vec<ThreadEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub sender: String,
    pub date: String,
    pub body: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentsView {
    pub subject: Option<String>,
    pub sender: Option<String>,
    pub attachments: Vec<AttachmentCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentIcon {
    Pdf,
    Document,
    Generic,
}

impl AttachmentIcon {
    /// Pick the icon from the filename suffix (ASCII case-insensitive).
    pub fn for_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            AttachmentIcon::Pdf
        } else if lower.ends_with(".docx") {
            AttachmentIcon::Document
        } else {
            AttachmentIcon::Generic
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentCard {
    pub filename: String,
    pub icon: AttachmentIcon,
    pub mime_type: Option<String>,
    /// Size in kilobytes, e.g. `"2.0 KB"`.
    pub size: String,
    pub preview: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentConfirmation {
    pub to: String,
    pub subject: String,
    pub status: String,
    pub delivered: bool,
}

// =============================================================================
// Rendering
// =============================================================================

/// Map the current payload (if any) to its display model.
pub fn render_context(payload: Option<&ContextPayload>) -> ContextView {
    let Some(payload) = payload else {
        return ContextView::Prompt;
    };

    let Some(tag) = payload.tag() else {
        tracing::debug!(kind = %payload.kind, "Unrecognized context type, rendering nothing");
        return ContextView::Hidden;
    };

    let data = &payload.data;
    match tag {
        ContextTag::CalendarEvents => ContextView::CalendarEvents(render_calendar(data)),
        ContextTag::FreeSlots => ContextView::FreeSlots(render_availability(data)),
        ContextTag::EventCreated => ContextView::EventCreated(render_event_created(data)),
        ContextTag::EmailList => ContextView::EmailList(render_inbox(data)),
        ContextTag::EmailThread => ContextView::EmailThread(render_thread(data)),
        ContextTag::EmailAttachments => ContextView::EmailAttachments(render_attachments(data)),
        ContextTag::EmailSent => ContextView::EmailSent(render_sent(data)),
    }
}

fn render_calendar(data: &Value) -> CalendarView {
    let events = items(data)
        .iter()
        .map(|event| EventCard {
            title: opt_text(event, "summary").unwrap_or_else(|| UNTITLED_EVENT.to_string()),
            start: text(event, "start"),
            end: text(event, "end"),
            location: opt_text(event, "location"),
            description: opt_text(event, "description"),
            attendees: strings(event, "attendees"),
        })
        .collect();
    CalendarView { events }
}

fn render_availability(data: &Value) -> AvailabilityView {
    let slots = |key: &str| -> Vec<SlotRow> {
        list(data, key)
            .iter()
            .map(|slot| SlotRow {
                start: text(slot, "start"),
                end: text(slot, "end"),
                label: opt_text(slot, "event"),
            })
            .collect()
    };

    AvailabilityView {
        date: opt_text(data, "date"),
        busy: slots("busy"),
        free: slots("free"),
    }
}

fn render_event_created(data: &Value) -> EventConfirmation {
    EventConfirmation {
        title: opt_text(data, "summary").unwrap_or_else(|| UNTITLED_EVENT.to_string()),
        date: text(data, "date"),
        start: text(data, "start"),
        end: text(data, "end"),
        attendees: strings(data, "attendees"),
        link: opt_text(data, "link"),
    }
}

fn render_inbox(data: &Value) -> InboxView {
    let emails = items(data)
        .iter()
        .map(|email| {
            let sender = text(email, "from");
            EmailRow {
                avatar: avatar_label(&sender),
                sender,
                subject: text(email, "subject"),
                snippet: opt_text(email, "snippet"),
                date: opt_text(email, "date"),
            }
        })
        .collect();
    InboxView { emails }
}

fn render_thread(data: &Value) -> ThreadView {
    let entries = list(data, "messages")
        .iter()
        .map(|message| {
            let (body, truncated) = truncate_chars(&text(message, "body"), THREAD_BODY_LIMIT);
            ThreadEntry {
                sender: display_name(&text(message, "from")),
                date: short_date(&text(message, "date")),
                body,
                truncated,
            }
        })
        .collect();

    ThreadView {
        subject: opt_text(data, "subject"),
        entries,
    }
}

fn render_attachments(data: &Value) -> AttachmentsView {
    let attachments = list(data, "attachments")
        .iter()
        .map(|attachment| {
            let filename = text(attachment, "filename");
            let (preview, truncated) =
                truncate_chars(&text(attachment, "content"), ATTACHMENT_PREVIEW_LIMIT);
            let bytes = attachment
                .get("size")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            AttachmentCard {
                icon: AttachmentIcon::for_filename(&filename),
                filename,
                mime_type: opt_text(attachment, "mime_type"),
                size: format_kilobytes(bytes),
                preview,
                truncated,
            }
        })
        .collect();

    AttachmentsView {
        subject: opt_text(data, "subject"),
        sender: opt_text(data, "from"),
        attachments,
    }
}

fn render_sent(data: &Value) -> SentConfirmation {
    let status = text(data, "status");
    SentConfirmation {
        to: text(data, "to"),
        subject: text(data, "subject"),
        delivered: status == DELIVERED_STATUS,
        status,
    }
}

// -- Field rules --

/// Uppercased first character of the sender, or `"?"`.
pub fn avatar_label(sender: &str) -> String {
    sender
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// `"Ana Díaz <ana@example.com>"` -> `"Ana Díaz"`.
pub fn display_name(from: &str) -> String {
    from.split_once('<')
        .map_or(from, |(name, _)| name)
        .trim()
        .to_string()
}

/// Keep the first two comma-separated segments of a date header.
pub fn short_date(date: &str) -> String {
    date.split(',').take(2).collect::<Vec<_>>().join(",")
}

/// Cut `s` to `limit` characters, appending [`ELLIPSIS`] only when something
/// was cut.
pub fn truncate_chars(s: &str, limit: usize) -> (String, bool) {
    match s.char_indices().nth(limit) {
        Some((byte_idx, _)) => (format!("{}{}", &s[..byte_idx], ELLIPSIS), true),
        None => (s.to_string(), false),
    }
}

/// Bytes as kilobytes with one decimal place.
pub fn format_kilobytes(bytes: f64) -> String {
    format!("{:.1} KB", bytes / 1024.0)
}

// -- Lenient JSON access --

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn opt_text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value.get(key).map(items).unwrap_or(&[])
}

fn strings(value: &Value, key: &str) -> Vec<String> {
    list(value, key)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}
