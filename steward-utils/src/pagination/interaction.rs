//! Dispatcher for pagination button clicks and jump-modal submissions.

use tracing::{debug, warn};

use super::{
    JUMP_INPUT_ID, PAGINATION_EXPIRED_MESSAGE, PAGINATION_WRONG_USER_MESSAGE, Paginator,
    components::build_jump_modal,
    page::{JumpError, parse_jump_target},
    reducer::PageEvent,
    view::{nav_state, render, render_expired},
};
use crate::{
    UNKNOWN_USER_MESSAGE,
    custom_id::{Action, CustomId, PageAction},
    event::ComponentEvent,
    store::{Entry, SessionRecord},
    transport::{MessagePayload, Modal, ResponseTarget},
};

/// What the dispatcher did with an inbound interaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PaginationOutcome {
    /// Not a pagination interaction; other handlers may process it.
    NotForPaginator,
    /// No acting user attached; answered ephemerally.
    UnknownUser,
    /// No live session under that id; answered ephemerally.
    Missing,
    /// Session had expired; it was removed and its message made inert.
    Expired,
    /// Actor is not the session owner; session untouched.
    WrongUser,
    /// Jump modal opened; session untouched.
    JumpModalOpened,
    /// Jump input rejected; session untouched.
    InvalidJump(JumpError),
    /// Session advanced and the message was re-rendered.
    Updated { page: usize },
}

enum Step {
    Expired(MessagePayload),
    WrongUser,
    OpenModal(Modal),
    InvalidJump(JumpError),
    Render { payload: MessagePayload, page: usize },
}

impl Paginator {
    /// Route one component interaction to its pagination session.
    ///
    /// Never fails: delivery faults are logged and the session stays as last
    /// persisted.
    pub async fn handle(&self, event: &ComponentEvent) -> PaginationOutcome {
        let Some(CustomId {
            session_id,
            action: Action::Page(action),
        }) = CustomId::decode(&event.custom_id)
        else {
            return PaginationOutcome::NotForPaginator;
        };

        // `jump` only ever arrives as a modal submission, everything else as a
        // button click.
        if (action == PageAction::Jump) != event.is_modal_submit() {
            return PaginationOutcome::NotForPaginator;
        }

        let Some(actor_id) = event.user_id else {
            self.notify(event, &session_id, UNKNOWN_USER_MESSAGE).await;
            return PaginationOutcome::UnknownUser;
        };

        let now = self.clock.now();
        let jump_input = event.field(JUMP_INPUT_ID);

        // Decide and persist under one store lock; no await until it returns.
        let step = self.store.modify(&session_id, |session| {
            if session.is_expired(now) {
                return Entry::Remove(Step::Expired(render_expired(session)));
            }

            if session.is_owned_by_other(actor_id) {
                return Entry::Keep(Step::WrongUser);
            }

            let page_event = match action {
                PageAction::Prev => PageEvent::Prev,
                PageAction::Next => PageEvent::Next,
                PageAction::Page if nav_state(session).can_jump => {
                    return Entry::Keep(Step::OpenModal(build_jump_modal(
                        &session.id,
                        session.total_pages(),
                    )));
                }
                PageAction::Page => {
                    return Entry::Keep(Step::Render {
                        payload: render(session),
                        page: session.current_page(),
                    });
                }
                PageAction::Jump => {
                    match parse_jump_target(jump_input.unwrap_or_default(), session.total_pages()) {
                        Ok(index) => PageEvent::Goto(index),
                        Err(error) => return Entry::Keep(Step::InvalidJump(error)),
                    }
                }
            };

            session.apply(page_event, now, self.ttl);

            Entry::Keep(Step::Render {
                payload: render(session),
                page: session.current_page(),
            })
        });

        let target = ResponseTarget::Interaction(event.interaction.clone());

        match step {
            None => {
                self.notify(event, &session_id, PAGINATION_EXPIRED_MESSAGE)
                    .await;
                PaginationOutcome::Missing
            }
            Some(Step::Expired(payload)) => {
                debug!(session_id = %session_id, "pagination session expired on interaction");
                if let Err(source) = self.transport.update(&target, &payload).await {
                    warn!(?source, session_id = %session_id, "failed to render expired pagination message");
                }
                PaginationOutcome::Expired
            }
            Some(Step::WrongUser) => {
                self.notify(event, &session_id, PAGINATION_WRONG_USER_MESSAGE)
                    .await;
                PaginationOutcome::WrongUser
            }
            Some(Step::OpenModal(modal)) => {
                if let Err(source) = self.transport.open_modal(&event.interaction, &modal).await {
                    warn!(?source, session_id = %session_id, "failed to open jump modal");
                }
                PaginationOutcome::JumpModalOpened
            }
            Some(Step::InvalidJump(error)) => {
                self.notify(event, &session_id, &error.to_string()).await;
                PaginationOutcome::InvalidJump(error)
            }
            Some(Step::Render { payload, page }) => {
                if let Err(source) = self.transport.update(&target, &payload).await {
                    warn!(?source, session_id = %session_id, page, "failed to update pagination message");
                }
                PaginationOutcome::Updated { page }
            }
        }
    }

    async fn notify(&self, event: &ComponentEvent, session_id: &str, content: &str) {
        if let Err(source) = self.transport.notify(&event.interaction, content).await {
            warn!(?source, session_id, "failed to send pagination notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::{
        clock::Clock,
        config::SessionConfig,
        pagination::{PageContent, SessionOptions},
        testing::{Call, ManualClock, RecordingTransport, button, modal_submit},
        transport::MessageRef,
    };

    const OWNER: u64 = 10;
    const STRANGER: u64 = 20;

    struct Harness {
        clock: Arc<ManualClock>,
        transport: Arc<RecordingTransport>,
        paginator: Paginator,
    }

    fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new());
        let transport = Arc::new(RecordingTransport::default());
        let config = SessionConfig {
            pagination_ttl: Duration::seconds(120),
            max_lifetime: None,
            ..SessionConfig::default()
        };
        let paginator = Paginator::new(&config, clock.clone(), transport.clone());

        Harness {
            clock,
            transport,
            paginator,
        }
    }

    fn numbered(items: &[u32], _info: crate::pagination::PageInfo) -> PageContent {
        let lines: Vec<String> = items.iter().map(|n| format!("item {n}")).collect();
        PageContent::text(lines.join("\n"))
    }

    fn create(h: &Harness, count: u32, user_id: Option<u64>) -> String {
        let items: Vec<u32> = (1..=count).collect();
        let options = SessionOptions {
            user_id,
            ..SessionOptions::default()
        };
        h.paginator.create(&items, &options, numbered)
    }

    fn click(id: &str, action: &str) -> String {
        format!("pg:{id}:{action}")
    }

    fn page_of(h: &Harness, id: &str) -> usize {
        h.paginator.session(id).unwrap().current_page()
    }

    #[tokio::test]
    async fn walks_pages_and_clamps_at_the_end() {
        let h = harness();
        let id = create(&h, 25, None);
        assert_eq!(h.paginator.session(&id).unwrap().total_pages(), 3);

        for expected in [1, 2, 2] {
            let outcome = h.paginator.handle(&button(&click(&id, "next"), STRANGER)).await;
            assert_eq!(outcome, PaginationOutcome::Updated { page: expected });
        }

        let outcome = h.paginator.handle(&button(&click(&id, "prev"), OWNER)).await;
        assert_eq!(outcome, PaginationOutcome::Updated { page: 1 });

        let Some(Call::Update(ResponseTarget::Interaction(_), payload)) = h.transport.last() else {
            panic!("expected an in-place update");
        };
        assert_eq!(payload.content.as_deref().unwrap().lines().next(), Some("item 11"));
        assert_eq!(payload.components.len(), 1);
    }

    #[tokio::test]
    async fn navigation_slides_expiry() {
        let h = harness();
        let id = create(&h, 30, None);

        h.clock.advance(Duration::seconds(100));
        h.paginator.handle(&button(&click(&id, "prev"), OWNER)).await;

        let session = h.paginator.session(&id).unwrap();
        assert_eq!(session.current_page(), 0);
        assert_eq!(session.state.expires_at, h.clock.now() + Duration::seconds(120));
    }

    #[tokio::test]
    async fn lifetime_cap_bounds_sliding_expiry() {
        let clock = Arc::new(ManualClock::new());
        let transport = Arc::new(RecordingTransport::default());
        let config = SessionConfig {
            pagination_ttl: Duration::seconds(120),
            max_lifetime: Some(Duration::seconds(150)),
            ..SessionConfig::default()
        };
        let paginator = Paginator::new(&config, clock.clone(), transport);
        let id = paginator.create(&[1, 2, 3], &SessionOptions::default(), |_, _| {
            PageContent::default()
        });
        let created = clock.now();

        clock.advance(Duration::seconds(100));
        paginator.handle(&button(&click(&id, "next"), OWNER)).await;

        assert_eq!(
            paginator.session(&id).unwrap().state.expires_at,
            created + Duration::seconds(150)
        );
    }

    #[tokio::test]
    async fn expired_session_is_removed_and_made_inert() {
        let h = harness();
        let id = create(&h, 25, None);

        h.clock.advance(Duration::seconds(121));
        let outcome = h.paginator.handle(&button(&click(&id, "next"), OWNER)).await;

        assert_eq!(outcome, PaginationOutcome::Expired);
        assert!(h.paginator.session(&id).is_none());
        let Some(Call::Update(_, payload)) = h.transport.last() else {
            panic!("expected the message to be updated");
        };
        assert!(payload.components.is_empty());
        assert!(payload.content.unwrap().ends_with(crate::pagination::EXPIRED_NOTE));
    }

    #[tokio::test]
    async fn unknown_session_gets_expired_notice() {
        let h = harness();
        let outcome = h.paginator.handle(&button("pg:gone1234:next", OWNER)).await;

        assert_eq!(outcome, PaginationOutcome::Missing);
        assert_eq!(h.transport.notices(), vec![PAGINATION_EXPIRED_MESSAGE.to_owned()]);
    }

    #[tokio::test]
    async fn invalidated_session_answers_as_expired() {
        let h = harness();
        let id = create(&h, 25, None);
        assert!(h.paginator.invalidate(&id));

        let outcome = h.paginator.handle(&button(&click(&id, "next"), OWNER)).await;
        assert_eq!(outcome, PaginationOutcome::Missing);
    }

    #[tokio::test]
    async fn other_users_cannot_drive_owned_sessions() {
        let h = harness();
        let id = create(&h, 25, Some(OWNER));
        let before = h.paginator.session(&id).unwrap().state;

        let outcome = h.paginator.handle(&button(&click(&id, "next"), STRANGER)).await;

        assert_eq!(outcome, PaginationOutcome::WrongUser);
        assert_eq!(h.paginator.session(&id).unwrap().state, before);
        assert_eq!(h.transport.notices(), vec![PAGINATION_WRONG_USER_MESSAGE.to_owned()]);

        let outcome = h.paginator.handle(&button(&click(&id, "next"), OWNER)).await;
        assert_eq!(outcome, PaginationOutcome::Updated { page: 1 });
    }

    #[tokio::test]
    async fn label_opens_jump_modal() {
        let h = harness();
        let id = create(&h, 25, None);

        let outcome = h.paginator.handle(&button(&click(&id, "page"), OWNER)).await;

        assert_eq!(outcome, PaginationOutcome::JumpModalOpened);
        let Some(Call::Modal(_, modal)) = h.transport.last() else {
            panic!("expected a modal");
        };
        assert_eq!(modal.custom_id, click(&id, "jump"));
        assert_eq!(page_of(&h, &id), 0);
    }

    #[tokio::test]
    async fn jump_submission_moves_to_requested_page() {
        let h = harness();
        let id = create(&h, 25, None);

        let outcome = h.paginator.handle(&modal_submit(&click(&id, "jump"), OWNER, "3")).await;

        assert_eq!(outcome, PaginationOutcome::Updated { page: 2 });
        assert_eq!(page_of(&h, &id), 2);
    }

    #[tokio::test]
    async fn out_of_range_jump_is_rejected_without_moving() {
        let h = harness();
        let id = create(&h, 25, None);

        let outcome = h.paginator.handle(&modal_submit(&click(&id, "jump"), OWNER, "99")).await;

        assert_eq!(
            outcome,
            PaginationOutcome::InvalidJump(JumpError::OutOfRange {
                requested: 99,
                total: 3
            })
        );
        assert_eq!(page_of(&h, &id), 0);
        assert_eq!(
            h.transport.notices(),
            vec!["Page 99 does not exist. Available pages: 1-3.".to_owned()]
        );
    }

    #[tokio::test]
    async fn non_numeric_jump_is_rejected() {
        let h = harness();
        let id = create(&h, 25, None);

        let outcome = h.paginator.handle(&modal_submit(&click(&id, "jump"), OWNER, "x")).await;
        assert_eq!(outcome, PaginationOutcome::InvalidJump(JumpError::NotANumber));
    }

    #[tokio::test]
    async fn foreign_and_mismatched_ids_are_ignored() {
        let h = harness();
        let id = create(&h, 25, None);

        for event in [
            button("terminate:confirm:1:2:0", OWNER),
            button("confirm:abc:confirm", OWNER),
            button(&click(&id, "jump"), OWNER),
            modal_submit(&click(&id, "next"), OWNER, "2"),
        ] {
            assert_eq!(h.paginator.handle(&event).await, PaginationOutcome::NotForPaginator);
        }
        assert!(h.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_actor_is_rejected() {
        let h = harness();
        let id = create(&h, 25, None);
        let mut event = button(&click(&id, "next"), OWNER);
        event.user_id = None;

        assert_eq!(h.paginator.handle(&event).await, PaginationOutcome::UnknownUser);
        assert_eq!(page_of(&h, &id), 0);
    }

    #[tokio::test]
    async fn delivery_failure_keeps_persisted_state() {
        let h = harness();
        let id = create(&h, 25, None);
        h.transport.set_failing(true);

        let outcome = h.paginator.handle(&button(&click(&id, "next"), OWNER)).await;

        assert_eq!(outcome, PaginationOutcome::Updated { page: 1 });
        assert_eq!(page_of(&h, &id), 1);
    }

    #[tokio::test]
    async fn send_records_message_and_failed_send_discards_session() {
        let h = harness();
        let target = ResponseTarget::Channel(twilight_model::id::Id::new(5));

        let id = h
            .paginator
            .start(&target, &[1_u32, 2, 3], &SessionOptions::default(), numbered)
            .await
            .unwrap();
        assert!(matches!(
            h.paginator.session(&id).unwrap().message,
            Some(MessageRef { .. })
        ));

        h.transport.set_failing(true);
        let failed = h
            .paginator
            .start(&target, &[1_u32], &SessionOptions::default(), numbered)
            .await;
        assert!(failed.is_err());
        assert_eq!(h.paginator.live_sessions(), 1);
    }

    #[tokio::test]
    async fn sweep_strips_controls_from_expired_messages() {
        let h = harness();
        let target = ResponseTarget::Channel(twilight_model::id::Id::new(5));
        let id = h
            .paginator
            .start(&target, &[1_u32, 2, 3], &SessionOptions::default(), numbered)
            .await
            .unwrap();
        let message = h.paginator.session(&id).unwrap().message.unwrap();
        h.transport.clear();

        assert_eq!(h.paginator.sweep().await, 0);
        h.clock.advance(Duration::seconds(120));
        assert_eq!(h.paginator.sweep().await, 1);

        assert!(h.paginator.session(&id).is_none());
        let Some(Call::Update(ResponseTarget::Message(edited), payload)) = h.transport.last() else {
            panic!("expected the expired message to be edited");
        };
        assert_eq!(edited, message);
        assert!(payload.components.is_empty());
    }

    #[tokio::test]
    async fn empty_list_renders_empty_text() {
        let h = harness();
        let options = SessionOptions {
            empty_text: "No keywords configured.".to_owned(),
            ..SessionOptions::default()
        };
        let id = h.paginator.create(&[] as &[u32], &options, numbered);

        let session = h.paginator.session(&id).unwrap();
        assert_eq!(session.total_pages(), 1);
        assert_eq!(session.page().content.as_deref(), Some("No keywords configured."));
    }

    #[tokio::test]
    async fn start_page_is_clamped_to_the_last_page() {
        let h = harness();
        let items: Vec<u32> = (1..=25).collect();

        let second = SessionOptions {
            start_page: 1,
            ..SessionOptions::default()
        };
        let id = h.paginator.create(&items, &second, numbered);
        assert_eq!(page_of(&h, &id), 1);

        let beyond = SessionOptions {
            start_page: 40,
            ..SessionOptions::default()
        };
        let id = h.paginator.create(&items, &beyond, numbered);
        assert_eq!(page_of(&h, &id), 2);
    }
}
