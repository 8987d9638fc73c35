//! Pure page-navigation reducer.

use chrono::{DateTime, Duration, Utc};

/// Navigation state of one paginator session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageState {
    /// Zero-based, always `< total_pages`.
    pub current_page: usize,
    /// Always at least one.
    pub total_pages: usize,
    pub expires_at: DateTime<Utc>,
}

impl PageState {
    pub fn new(total_pages: usize, expires_at: DateTime<Utc>) -> Self {
        Self {
            current_page: 0,
            total_pages: total_pages.max(1),
            expires_at,
        }
    }

    fn last_page(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }
}

/// Navigation events fed to [`reduce`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageEvent {
    Prev,
    Next,
    /// Go to an explicit zero-based page, already validated by the caller.
    Goto(usize),
    /// Expiry marker; never changes state. Expiry itself is detected by
    /// comparing `expires_at` against the clock.
    Timeout,
}

/// Compute the next navigation state.
///
/// Every navigation event pushes `expires_at` to `now + ttl`, including
/// no-op moves at either boundary.
pub fn reduce(state: PageState, event: PageEvent, now: DateTime<Utc>, ttl: Duration) -> PageState {
    let current_page = match event {
        PageEvent::Prev => state.current_page.saturating_sub(1),
        PageEvent::Next => (state.current_page + 1).min(state.last_page()),
        PageEvent::Goto(target) => target.min(state.last_page()),
        PageEvent::Timeout => return state,
    };

    PageState {
        current_page,
        expires_at: now + ttl,
        ..state
    }
}
