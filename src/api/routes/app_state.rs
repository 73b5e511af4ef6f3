//! Application state management.
//!
//! The state is built by a factory and injected into every handler via
//! `Router::with_state`; nothing is initialized at import time.

use std::sync::Arc;

use crate::storage::PromotionStore;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend for promotion records
    pub store: Arc<dyn PromotionStore>,
}

impl AppState {
    /// Create application state around an existing store.
    pub fn new(store: Arc<dyn PromotionStore>) -> Self {
        Self { store }
    }
}
