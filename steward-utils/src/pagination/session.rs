use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use twilight_model::channel::message::embed::Embed;

use super::reducer::{PageEvent, PageState, reduce};
use crate::{store::SessionRecord, transport::MessageRef};

/// Pre-rendered body of a single page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageContent {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

impl PageContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// Per-session options chosen by the command that starts pagination.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Only this user may drive the session; `None` lets anyone.
    pub user_id: Option<u64>,
    pub per_page: usize,
    /// Text of the single page shown for an empty list.
    pub empty_text: String,
    /// Whether the page label opens the jump modal.
    pub jump_enabled: bool,
    /// Zero-based page shown first; clamped to the last page.
    pub start_page: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            user_id: None,
            per_page: 10,
            empty_text: "Nothing to show.".to_owned(),
            jump_enabled: true,
            start_page: 0,
        }
    }
}

impl SessionOptions {
    pub fn owned_by(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }
}

/// Server-side state of one paginated message.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    /// Immutable after creation.
    pub pages: Arc<[PageContent]>,
    pub state: PageState,
    /// Absolute expiry cap, independent of activity.
    pub deadline: Option<DateTime<Utc>>,
    pub user_id: Option<u64>,
    pub jump_enabled: bool,
    /// Where the paginated message lives once sent.
    pub message: Option<MessageRef>,
}

impl Session {
    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages
    }

    pub fn page(&self) -> &PageContent {
        // `current_page < total_pages == pages.len()` always holds.
        &self.pages[self.state.current_page]
    }

    pub fn is_owned_by_other(&self, actor: u64) -> bool {
        self.user_id.is_some_and(|owner| owner != actor)
    }

    /// Apply a navigation event, keeping expiry within the lifetime cap.
    pub fn apply(&mut self, event: PageEvent, now: DateTime<Utc>, ttl: Duration) {
        let mut next = reduce(self.state, event, now, ttl);
        if let Some(deadline) = self.deadline {
            next.expires_at = next.expires_at.min(deadline);
        }
        self.state = next;
    }
}

impl SessionRecord for Session {
    fn id(&self) -> &str {
        &self.id
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.state.expires_at
    }
}
