//! Session controller: sequences operator actions, backend calls, and chat
//! turns under the single-flight guard.
//!
//! Each public operation holds a [`FlightPermit`](crate::session::FlightPermit)
//! for its whole span, so the loading flag is set before the first backend
//! call and released on every exit path. Failures inside an operation are
//! caught once at the boundary and become a single assistant message; earlier
//! progress (messages, context) is never rolled back.

use std::sync::Arc;

use crate::error::ChatError;
use crate::session::SessionState;
use crate::transport::Transport;
use crate::types::{ContextPayload, EmailSummary, Role};

/// User turn recorded for the summarize quick action.
pub const SUMMARIZE_PROMPT: &str = "Summarize my unread emails from today";
pub const FETCHING_NOTICE: &str = "Fetching your unread emails...";
pub const INBOX_ZERO_NOTICE: &str = "You have no unread emails today. Inbox zero!";
pub const SUMMARIZING_NOTICE: &str = "Summarizing your emails...";

/// Result of invoking an orchestrated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran; any failure was reported in the message log.
    Completed,
    /// The operation was a silent no-op.
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Free-text input was blank after trimming.
    EmptyInput,
    /// Another operation is already in flight.
    Busy,
}

/// Drives one conversation against a [`Transport`].
pub struct SessionController<T> {
    transport: T,
    state: Arc<SessionState>,
}

impl<T: Transport> SessionController<T> {
    pub fn new(transport: T, state: Arc<SessionState>) -> Self {
        Self { transport, state }
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Quick action: fetch today's unread emails, list them, and summarize.
    pub async fn handle_summarize(&self) -> Outcome {
        let Some(_permit) = self.state.try_begin() else {
            tracing::debug!(session = %self.state.id(), "Summarize ignored: operation in flight");
            return Outcome::Ignored(IgnoreReason::Busy);
        };

        tracing::info!(session = %self.state.id(), "Summarize started");
        self.state.push_message(Role::User, SUMMARIZE_PROMPT);

        if let Err(e) = self.summarize_steps().await {
            tracing::warn!(session = %self.state.id(), error = %e, "Summarize failed");
            self.report_failure(&e);
        }

        tracing::info!(session = %self.state.id(), "Summarize finished");
        Outcome::Completed
    }

    /// Free-text turn: send `text` to the agent and record its reply.
    pub async fn handle_send(&self, text: &str) -> Outcome {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(session = %self.state.id(), "Send ignored: empty input");
            return Outcome::Ignored(IgnoreReason::EmptyInput);
        }

        let Some(_permit) = self.state.try_begin() else {
            tracing::debug!(session = %self.state.id(), "Send ignored: operation in flight");
            return Outcome::Ignored(IgnoreReason::Busy);
        };

        tracing::info!(session = %self.state.id(), chars = text.chars().count(), "Send started");
        self.state.push_message(Role::User, text);

        if let Err(e) = self.send_steps(text).await {
            tracing::warn!(session = %self.state.id(), error = %e, "Send failed");
            self.report_failure(&e);
        }

        tracing::info!(session = %self.state.id(), "Send finished");
        Outcome::Completed
    }

    async fn summarize_steps(&self) -> Result<(), ChatError> {
        self.state.push_message(Role::Assistant, FETCHING_NOTICE);
        let unread = self.transport.fetch_unread_today().await?;

        if let Some(error) = unread.error.filter(|e| !e.is_empty()) {
            tracing::warn!(session = %self.state.id(), error = %error, "Backend reported an error");
            self.state
                .push_message(Role::Assistant, format!("Error: {}", error));
            return Ok(());
        }

        let emails = unread.emails.unwrap_or_default();
        if emails.is_empty() {
            self.state.push_message(Role::Assistant, INBOX_ZERO_NOTICE);
            self.state.replace_context(ContextPayload::email_list(&[])?);
            return Ok(());
        }

        tracing::info!(session = %self.state.id(), count = emails.len(), "Unread emails fetched");
        self.state
            .push_message(Role::Assistant, describe_unread(&emails));
        self.state
            .replace_context(ContextPayload::email_list(&emails)?);

        self.state.push_message(Role::Assistant, SUMMARIZING_NOTICE);
        let digest = self.transport.summarize_emails(&emails).await?;
        self.state.push_message(Role::Assistant, digest.summary);
        Ok(())
    }

    async fn send_steps(&self, text: &str) -> Result<(), ChatError> {
        let reply = self.transport.send_chat_message(text).await?;
        self.state.push_message(Role::Assistant, reply.reply);

        if let Some(context) = reply.context {
            tracing::debug!(session = %self.state.id(), kind = %context.kind, "Context replaced");
            self.state.replace_context(context);
        }
        Ok(())
    }

    fn report_failure(&self, err: &ChatError) {
        self.state
            .push_message(Role::Assistant, format!("Something went wrong: {}", err));
    }
}

/// Listing of fetched emails, one numbered line per email.
fn describe_unread(emails: &[EmailSummary]) -> String {
    let noun = if emails.len() == 1 { "email" } else { "emails" };
    let mut lines = vec![format!(
        "You have **{}** unread {} today:",
        emails.len(),
        noun
    )];
    lines.push(String::new());
    for (i, email) in emails.iter().enumerate() {
        lines.push(format!("{}. **{}**: {}", i + 1, email.from, email.subject));
    }
    lines.join("\n")
}
