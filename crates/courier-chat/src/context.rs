//! Holder for the most recent structured context.

use crate::types::ContextPayload;

/// Holds at most one [`ContextPayload`].
///
/// A new payload replaces the previous one wholesale; nothing is merged and
/// nothing ever clears the store.
#[derive(Debug, Default, Clone)]
pub struct ContextStore {
    current: Option<ContextPayload>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ContextPayload> {
        self.current.as_ref()
    }

    /// Install `payload`, returning the one it displaced.
    pub fn replace(&mut self, payload: ContextPayload) -> Option<ContextPayload> {
        self.current.replace(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContextTag;
    use serde_json::json;

    #[test]
    fn test_starts_empty() {
        let store = ContextStore::new();
        assert!(store.is_empty());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = ContextStore::new();
        let first = ContextPayload::new(
            ContextTag::FreeSlots,
            json!({"busy": [{"start": "09:00 AM"}], "free": []}),
        );
        assert!(store.replace(first.clone()).is_none());

        let second = ContextPayload::new(ContextTag::EmailSent, json!({"status": "sent"}));
        let displaced = store.replace(second.clone());

        assert_eq!(displaced, Some(first));
        assert_eq!(store.current(), Some(&second));
        assert!(store.current().unwrap().data.get("busy").is_none());
    }
}
