//! Button-driven pagination backed by short-lived server-side sessions.
//!
//! A command builds every page up front and hands them to [`Paginator`];
//! every later click is routed back through [`Paginator::handle`] by the
//! session id embedded in the button custom ids.

mod components;
mod interaction;
mod page;
mod reducer;
mod session;
mod view;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

pub use components::{JUMP_INPUT_ID, build_jump_modal, build_nav_components};
pub use interaction::PaginationOutcome;
pub use page::{
    JumpError, PageInfo, build_pages, bulleted, page_window, parse_jump_target, total_pages,
};
pub use reducer::{PageEvent, PageState, reduce};
pub use session::{PageContent, Session, SessionOptions};
pub use view::{EXPIRED_NOTE, NavState, nav_state, render, render_expired};

use crate::{
    clock::Clock,
    config::SessionConfig,
    store::{Entry, SessionStore},
    transport::{ResponseTarget, Transport},
};

/// Generic message shown when a pagination interaction belongs to another user.
pub const PAGINATION_WRONG_USER_MESSAGE: &str = "This pagination session belongs to another user.";
/// Generic message shown when a pagination interaction has expired.
pub const PAGINATION_EXPIRED_MESSAGE: &str =
    "This pagination session expired. Run the command again.";

/// Owner of every live pagination session.
pub struct Paginator {
    store: SessionStore<Session>,
    clock: Arc<dyn Clock>,
    transport: Arc<dyn Transport>,
    ttl: Duration,
    max_lifetime: Option<Duration>,
}

impl Paginator {
    pub fn new(
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            clock,
            transport,
            ttl: config.pagination_ttl,
            max_lifetime: config.max_lifetime,
        }
    }

    /// Build every page for `items` and register a session. Returns its id.
    pub fn create<T>(
        &self,
        items: &[T],
        options: &SessionOptions,
        render_page: impl FnMut(&[T], PageInfo) -> PageContent,
    ) -> String {
        let pages: Arc<[PageContent]> = build_pages(items, options.per_page, render_page, || {
            PageContent::text(options.empty_text.clone())
        })
        .into();

        let now = self.clock.now();
        let deadline = self.max_lifetime.map(|lifetime| now + lifetime);
        let mut state = PageState::new(pages.len(), now + self.ttl);
        state.current_page = options.start_page.min(pages.len() - 1);
        if let Some(cap) = deadline {
            state.expires_at = state.expires_at.min(cap);
        }

        let id = self.store.insert_new(|id| Session {
            id,
            pages: Arc::clone(&pages),
            state,
            deadline,
            user_id: options.user_id,
            jump_enabled: options.jump_enabled,
            message: None,
        });

        debug!(session_id = %id, total_pages = pages.len(), "pagination session created");
        id
    }

    /// Send the first render of a registered session.
    ///
    /// On failure the session is discarded so no unreachable record lingers.
    pub async fn send(&self, session_id: &str, target: &ResponseTarget) -> anyhow::Result<()> {
        let Some(session) = self.store.get(session_id) else {
            anyhow::bail!("pagination session {session_id} does not exist");
        };

        match self.transport.send(target, &render(&session)).await {
            Ok(Some(message)) => {
                self.store.modify(session_id, |session| {
                    session.message = Some(message);
                    Entry::Keep(())
                });
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(source) => {
                self.store.delete(session_id);
                Err(source)
            }
        }
    }

    /// Create a session over `items` and send its first page.
    pub async fn start<T: Sync>(
        &self,
        target: &ResponseTarget,
        items: &[T],
        options: &SessionOptions,
        render_page: impl FnMut(&[T], PageInfo) -> PageContent + Send,
    ) -> anyhow::Result<String> {
        let id = self.create(items, options, render_page);
        self.send(&id, target).await?;
        Ok(id)
    }

    /// Snapshot of a live session.
    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.store.get(session_id)
    }

    /// Drop a session; its next click is answered as expired.
    pub fn invalidate(&self, session_id: &str) -> bool {
        self.store.delete(session_id).is_some()
    }

    pub fn live_sessions(&self) -> usize {
        self.store.len()
    }

    /// Remove expired sessions using the injected clock.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(self.clock.now()).await
    }

    /// Remove sessions expired at `now` and strip the controls from their
    /// messages. Returns how many sessions were removed.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let expired = self.store.sweep_expired(now);

        for session in &expired {
            let Some(message) = session.message else {
                continue;
            };

            if let Err(source) = self
                .transport
                .update(&ResponseTarget::Message(message), &render_expired(session))
                .await
            {
                warn!(?source, session_id = %session.id, "failed to strip expired pagination controls");
            }
        }

        if !expired.is_empty() {
            debug!(removed = expired.len(), "swept expired pagination sessions");
        }

        expired.len()
    }
}
