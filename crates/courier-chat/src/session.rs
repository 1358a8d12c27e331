//! Per-conversation state handle and the single-flight guard.
//!
//! The guard is a two-state machine:
//! Idle -> InFlight (on a successful `try_acquire`)
//! InFlight -> Idle (when the returned permit is dropped)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::context::ContextStore;
use crate::message_log::{Message, MessageId, MessageLog};
use crate::types::{ContextPayload, Role};

/// Observable state of the single-flight guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Idle,
    InFlight,
}

/// Admits at most one orchestrated operation at a time.
#[derive(Debug, Default)]
pub struct FlightGuard {
    in_flight: AtomicBool,
}

impl FlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlightState {
        if self.in_flight.load(Ordering::Acquire) {
            FlightState::InFlight
        } else {
            FlightState::Idle
        }
    }

    /// Move Idle -> InFlight. Returns `None` if an operation is already in
    /// flight. The guard returns to Idle when the permit is dropped, which
    /// covers normal return, early return, panics, and a cancelled future.
    pub fn try_acquire(&self) -> Option<FlightPermit<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit { guard: self })
    }
}

/// Proof that the holder owns the in-flight slot.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    guard: &'a FlightGuard,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.store(false, Ordering::Release);
    }
}

/// Mutable conversation state for one session: messages, loading, context.
///
/// Created at session start and shared between the controller and whatever
/// displays the conversation. Nothing here is persisted.
#[derive(Debug)]
pub struct SessionState {
    id: Uuid,
    started_at: DateTime<Local>,
    messages: Mutex<MessageLog>,
    context: Mutex<ContextStore>,
    flight: FlightGuard,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now(),
            messages: Mutex::new(MessageLog::new()),
            context: Mutex::new(ContextStore::new()),
            flight: FlightGuard::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// True for the whole span of an orchestrated operation.
    pub fn is_loading(&self) -> bool {
        self.flight.state() == FlightState::InFlight
    }

    pub fn flight_state(&self) -> FlightState {
        self.flight.state()
    }

    /// Snapshot of every message in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.messages).entries().to_vec()
    }

    /// Snapshot of the messages appended at or after position `start`.
    pub fn messages_since(&self, start: usize) -> Vec<Message> {
        lock(&self.messages).since(start).to_vec()
    }

    pub fn message_count(&self) -> usize {
        lock(&self.messages).len()
    }

    /// Snapshot of the current structured context.
    pub fn context(&self) -> Option<ContextPayload> {
        lock(&self.context).current().cloned()
    }

    pub(crate) fn try_begin(&self) -> Option<FlightPermit<'_>> {
        self.flight.try_acquire()
    }

    pub(crate) fn push_message(&self, role: Role, text: impl Into<String>) -> MessageId {
        lock(&self.messages).append(role, text)
    }

    pub(crate) fn replace_context(&self, payload: ContextPayload) {
        lock(&self.context).replace(payload);
    }
}

/// No invariant spans a panic inside these critical sections, so a poisoned
/// lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
