//! Render pipeline: session state to message payload.

use super::{components::build_nav_components, session::Session};
use crate::transport::MessagePayload;

/// Navigation affordances for the current page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavState {
    pub has_prev: bool,
    pub has_next: bool,
    pub can_jump: bool,
    /// One-based `current/total` label.
    pub label: String,
}

pub fn nav_state(session: &Session) -> NavState {
    let current = session.current_page();
    let total = session.total_pages();

    NavState {
        has_prev: current > 0,
        has_next: current + 1 < total,
        can_jump: session.jump_enabled && total > 1,
        label: format!("{}/{}", current + 1, total),
    }
}

/// Render the current page with its navigation row.
pub fn render(session: &Session) -> MessagePayload {
    let page = session.page();

    MessagePayload {
        content: page.content.clone(),
        embeds: page.embeds.clone(),
        components: build_nav_components(&session.id, &nav_state(session)),
    }
}

/// Line appended to the content of an expired paginated message.
pub const EXPIRED_NOTE: &str = "*This listing has expired. Run the command again to browse it.*";

/// Terminal render for an expired session: the last page marked as expired,
/// no controls.
pub fn render_expired(session: &Session) -> MessagePayload {
    let mut payload = render(session).without_components();

    payload.content = Some(match payload.content.take() {
        Some(content) if !content.is_empty() => format!("{content}\n\n{EXPIRED_NOTE}"),
        _ => EXPIRED_NOTE.to_owned(),
    });

    payload
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use twilight_model::channel::message::component::Component;

    use super::*;
    use crate::pagination::{PageContent, PageState};

    fn session(current_page: usize, total_pages: usize) -> Session {
        let pages: Vec<PageContent> = (0..total_pages)
            .map(|i| PageContent::text(format!("page {i}")))
            .collect();

        Session {
            id: "s3ss10n0".to_owned(),
            pages: Arc::from(pages),
            state: PageState {
                current_page,
                total_pages,
                expires_at: Utc::now(),
            },
            deadline: None,
            user_id: None,
            jump_enabled: true,
            message: None,
        }
    }

    fn buttons(payload: &MessagePayload) -> Vec<(String, String, bool)> {
        let [Component::ActionRow(row)] = payload.components.as_slice() else {
            panic!("expected exactly one action row");
        };

        row.components
            .iter()
            .map(|component| match component {
                Component::Button(button) => (
                    button.custom_id.clone().unwrap(),
                    button.label.clone().unwrap(),
                    button.disabled,
                ),
                other => panic!("unexpected component {other:?}"),
            })
            .collect()
    }

    #[test]
    fn first_page_disables_prev_only() {
        let payload = render(&session(0, 3));

        assert_eq!(payload.content.as_deref(), Some("page 0"));
        assert_eq!(
            buttons(&payload),
            vec![
                ("pg:s3ss10n0:prev".to_owned(), "◀ Prev".to_owned(), true),
                ("pg:s3ss10n0:page".to_owned(), "1/3".to_owned(), false),
                ("pg:s3ss10n0:next".to_owned(), "Next ▶".to_owned(), false),
            ]
        );
    }

    #[test]
    fn last_page_disables_next_only() {
        let labels = buttons(&render(&session(2, 3)));
        assert!(!labels[0].2);
        assert_eq!(labels[1].1, "3/3");
        assert!(labels[2].2);
    }

    #[test]
    fn single_page_keeps_layout_but_disables_everything() {
        let labels = buttons(&render(&session(0, 1)));
        assert_eq!(labels.len(), 3);
        assert!(labels.iter().all(|(_, _, disabled)| *disabled));
    }

    #[test]
    fn expired_render_is_marked_and_has_no_controls() {
        let payload = render_expired(&session(1, 3));
        assert_eq!(
            payload.content.as_deref(),
            Some(format!("page 1\n\n{EXPIRED_NOTE}").as_str())
        );
        assert!(payload.components.is_empty());
    }

    #[test]
    fn expired_embed_page_gets_the_note_as_content() {
        let mut expired = session(0, 1);
        expired.pages = Arc::from(vec![PageContent::default()]);

        let payload = render_expired(&expired);

        assert_eq!(payload.content.as_deref(), Some(EXPIRED_NOTE));
        assert_ne!(payload, render(&expired).without_components());
    }
}
