//! Application state shared by all handlers.

use qgate_core::Locale;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::resolver::ServerQuery;

/// Immutable per-process state plus a request counter for log correlation.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn ServerQuery>,
    pub locale: Locale,
    requests: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn ServerQuery>, locale: Locale) -> Self {
        Self {
            resolver,
            locale,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Monotonically increasing id, starting at 0.
    pub fn next_request_id(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed)
    }
}
