//! Conversation engine for Courier.
//!
//! Orchestrates the two operator flows (quick-action summarize and free-text
//! send) against the agent backend under a single-flight guard, keeps the
//! ordered message log and the latest structured context, and maps that
//! context to a display model.

pub mod context;
pub mod error;
pub mod message_log;
pub mod orchestrator;
pub mod render;
pub mod session;
pub mod transport;
pub mod types;

pub use context::ContextStore;
pub use error::{ChatError, TransportError};
pub use message_log::{Message, MessageId, MessageLog, Span};
pub use orchestrator::{IgnoreReason, Outcome, SessionController};
pub use render::{render_context, AttachmentIcon, ContextView};
pub use session::{FlightGuard, FlightPermit, FlightState, SessionState};
pub use transport::{HttpTransport, Transport};
pub use types::{
    ChatReply, ContextPayload, ContextTag, EmailDigest, EmailSummary, HealthStatus, Role,
    UnreadEmails,
};
