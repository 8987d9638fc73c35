use std::sync::Arc;

use twilight_http::Client;

use steward_utils::engine::SessionEngine;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub sessions: Arc<SessionEngine>,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, sessions: Arc<SessionEngine>) -> Self {
        Self { http, sessions }
    }
}
