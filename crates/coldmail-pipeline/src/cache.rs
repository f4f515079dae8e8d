use std::sync::{Arc, Mutex, PoisonError};

use coldmail_core::GenerationResult;

/// Single-slot holder for the most recent successful result.
///
/// Clones share the same slot. Each pipeline gets one handed in, so tests can
/// use an isolated instance. Concurrent writers race; the last `store` wins.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    slot: Arc<Mutex<Option<GenerationResult>>>,
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever the slot held.
    pub fn store(&self, result: GenerationResult) {
        // Writes replace the whole value, so a poisoned lock still holds a
        // complete result.
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(result);
    }

    /// The last stored result, or `None` when nothing has been generated yet.
    #[must_use]
    pub fn fetch_last(&self) -> Option<GenerationResult> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
