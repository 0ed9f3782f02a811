//! Request-generation tracking for views with overlapping fetches.
//!
//! Nothing in the access layer cancels an in-flight request, so a view that
//! refires on every input change can see responses resolve out of order. Each
//! fetch takes a token from [`Generations`] before dispatch and applies the
//! response only while its token is still current, so the display always
//! reflects the most recently requested state, not the most recently
//! completed one.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Generations {
    latest: AtomicU64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation, invalidating all earlier tokens.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` still belongs to the newest request.
    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}
