//! Plain-text presentation of chat turns and the context panel.

use courier_chat::render::{
    AttachmentIcon, AvailabilityView, CalendarView, ContextView, InboxView, SlotRow, PROMPT_TEXT,
};
use courier_chat::{Message, Role, Span};

use colored::Colorize;

/// Format one chat turn as terminal lines.
pub fn format_message(message: &Message, color: bool) -> Vec<String> {
    let prefix = match message.role {
        Role::User => "you",
        Role::Assistant => "agent",
    };
    let stamp = message.created_at.format("%H:%M");
    let indent = " ".repeat(prefix.len() + 2);

    message
        .lines()
        .iter()
        .enumerate()
        .map(|(i, spans)| {
            let body = format_spans(spans, color);
            if i == 0 {
                format!("[{}] {}> {}", stamp, prefix, body)
            } else {
                format!("        {}{}", indent, body)
            }
        })
        .collect()
}

fn format_spans(spans: &[Span], color: bool) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(t) => t.clone(),
            Span::Emphasis(t) if color => t.bold().to_string(),
            Span::Emphasis(t) => t.to_uppercase(),
        })
        .collect()
}

/// Format the context panel. Returns no lines for a hidden view.
pub fn format_context(view: &ContextView) -> Vec<String> {
    let mut out = Vec::new();
    match view {
        ContextView::Hidden => return out,
        ContextView::Prompt => out.push(PROMPT_TEXT.to_string()),
        ContextView::CalendarEvents(cal) => calendar_lines(cal, &mut out),
        ContextView::FreeSlots(slots) => availability_lines(slots, &mut out),
        ContextView::EventCreated(event) => {
            out.push(format!("Event created: {}", event.title));
            out.push(format!("  {} {}-{}", event.date, event.start, event.end));
            if !event.attendees.is_empty() {
                out.push(format!("  with {}", event.attendees.join(", ")));
            }
            if let Some(link) = &event.link {
                out.push(format!("  {}", link));
            }
        }
        ContextView::EmailList(inbox) => inbox_lines(inbox, &mut out),
        ContextView::EmailThread(thread) => {
            out.push(format!(
                "Thread: {}",
                thread.subject.as_deref().unwrap_or("(no subject)")
            ));
            for entry in &thread.entries {
                out.push(format!("  {} · {}", entry.sender, entry.date));
                for line in entry.body.lines() {
                    out.push(format!("    {}", line));
                }
            }
        }
        ContextView::EmailAttachments(view) => {
            out.push(format!(
                "Attachments: {}",
                view.subject.as_deref().unwrap_or("(no subject)")
            ));
            for card in &view.attachments {
                let icon = match card.icon {
                    AttachmentIcon::Pdf => "[pdf]",
                    AttachmentIcon::Document => "[doc]",
                    AttachmentIcon::Generic => "[file]",
                };
                out.push(format!("  {} {} ({})", icon, card.filename, card.size));
                if !card.preview.is_empty() {
                    out.push(format!("    {}", card.preview.replace('\n', " ")));
                }
            }
        }
        ContextView::EmailSent(sent) => {
            out.push(format!("Email to {}: {}", sent.to, sent.subject));
            if sent.delivered {
                out.push("  ✓ delivered".to_string());
            } else if !sent.status.is_empty() {
                out.push(format!("  status: {}", sent.status));
            }
        }
    }
    out
}

fn calendar_lines(cal: &CalendarView, out: &mut Vec<String>) {
    out.push("Calendar".to_string());
    if let Some(notice) = cal.notice() {
        out.push(format!("  {}", notice));
        return;
    }
    for event in &cal.events {
        out.push(format!("  {}-{}  {}", event.start, event.end, event.title));
        if let Some(location) = &event.location {
            out.push(format!("    @ {}", location));
        }
    }
}

fn availability_lines(view: &AvailabilityView, out: &mut Vec<String>) {
    out.push(format!(
        "Availability {}",
        view.date.as_deref().unwrap_or_default()
    ));
    if let Some(notice) = view.notice() {
        out.push(format!("  {}", notice));
        return;
    }
    let section = |title: &str, rows: &[SlotRow], out: &mut Vec<String>| {
        out.push(format!("  {}:", title));
        for row in rows {
            match &row.label {
                Some(label) => out.push(format!("    {} - {}  {}", row.start, row.end, label)),
                None => out.push(format!("    {} - {}", row.start, row.end)),
            }
        }
    };
    if let Some(busy) = view.busy_section() {
        section("Busy", busy, out);
    }
    if let Some(free) = view.free_section() {
        section("Free", free, out);
    }
}

fn inbox_lines(inbox: &InboxView, out: &mut Vec<String>) {
    out.push("Inbox".to_string());
    if let Some(notice) = inbox.notice() {
        out.push(format!("  {}", notice));
        return;
    }
    for email in &inbox.emails {
        out.push(format!("  ({}) {}: {}", email.avatar, email.sender, email.subject));
    }
}
