use std::sync::Arc;

use crate::services::Session;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
}

impl AppState {
    /// Wraps a ready session for sharing across handlers
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}
