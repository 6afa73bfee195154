use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the configured API key has been rejected by the provider.
///
/// Once marked invalid it stays invalid for the lifetime of the value.
#[derive(Debug, Default)]
pub struct ApiKeyState {
    invalid: AtomicBool,
}

impl ApiKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        !self.invalid.load(Ordering::Relaxed)
    }

    /// One-way: there is no transition back to valid except [`reset`](Self::reset).
    pub fn mark_invalid(&self) {
        self.invalid.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.invalid.store(false, Ordering::Relaxed);
    }
}
