//! Dispatcher for confirm/cancel button clicks.

use tracing::{debug, warn};

use super::{
    CONFIRMATION_EXPIRED_MESSAGE, CONFIRMATION_WRONG_USER_MESSAGE, ConfirmationManager,
    handler::Resolution,
};
use crate::{
    UNKNOWN_USER_MESSAGE,
    custom_id::{Action, ConfirmAction, CustomId},
    event::ComponentEvent,
    store::{Entry, Removal, SessionRecord},
    transport::ResponseTarget,
};

/// What the dispatcher did with an inbound interaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfirmationOutcome {
    /// Not a confirmation interaction; other handlers may process it.
    NotForConfirmation,
    /// No acting user attached; answered ephemerally.
    UnknownUser,
    /// Nothing pending under that id (already resolved or swept).
    Missing,
    /// Found but expired. The expiry callback runs here only for the
    /// requester's click; otherwise the sweep runs it.
    Expired,
    /// Clicked by someone other than the requester; still pending.
    WrongUser,
    Confirmed,
    Cancelled,
}

impl ConfirmationManager {
    /// Route one component interaction to its confirmation.
    ///
    /// The record is removed from the store before any callback runs, so a
    /// duplicate click can never resolve it a second time.
    pub async fn handle(&self, event: &ComponentEvent) -> ConfirmationOutcome {
        let Some(CustomId {
            session_id: confirmation_id,
            action: Action::Confirm(action),
        }) = CustomId::decode(&event.custom_id)
        else {
            return ConfirmationOutcome::NotForConfirmation;
        };

        if event.is_modal_submit() {
            return ConfirmationOutcome::NotForConfirmation;
        }

        let Some(actor_id) = event.user_id else {
            self.notify(event, &confirmation_id, UNKNOWN_USER_MESSAGE)
                .await;
            return ConfirmationOutcome::UnknownUser;
        };

        let now = self.clock.now();

        // Only the requester's click takes the record. Anyone else leaves it
        // for the requester or the sweep.
        let removal = self
            .store
            .remove_if(&confirmation_id, |confirmation| confirmation.user_id == actor_id);

        let confirmation = match removal {
            Removal::Missing => {
                self.notify(event, &confirmation_id, CONFIRMATION_EXPIRED_MESSAGE)
                    .await;
                return ConfirmationOutcome::Missing;
            }
            Removal::Kept => {
                let expired = self
                    .store
                    .modify(&confirmation_id, |confirmation| {
                        Entry::Keep(confirmation.is_expired(now))
                    })
                    .unwrap_or(true);

                if expired {
                    self.notify(event, &confirmation_id, CONFIRMATION_EXPIRED_MESSAGE)
                        .await;
                    return ConfirmationOutcome::Expired;
                }

                self.notify(event, &confirmation_id, CONFIRMATION_WRONG_USER_MESSAGE)
                    .await;
                return ConfirmationOutcome::WrongUser;
            }
            Removal::Removed(confirmation) => confirmation,
        };

        if confirmation.is_expired(now) {
            debug!(confirmation_id = %confirmation_id, "confirmation expired on interaction");
            self.notify(event, &confirmation_id, CONFIRMATION_EXPIRED_MESSAGE)
                .await;

            // The interaction is already answered; render expiry on the
            // prompt message itself.
            let target = confirmation
                .message
                .or(event.message)
                .map(ResponseTarget::Message);
            self.resolve(confirmation, Resolution::Expired, target).await;
            return ConfirmationOutcome::Expired;
        }

        // Answer within Discord's response window before the callback does
        // any slow work; the callback then edits the original response.
        if let Err(source) = self.transport.acknowledge(&event.interaction).await {
            warn!(?source, confirmation_id = %confirmation_id, "failed to acknowledge confirmation click");
        }

        let target = Some(ResponseTarget::Original(event.interaction.clone()));

        match action {
            ConfirmAction::Confirm => {
                self.resolve(confirmation, Resolution::Confirmed, target)
                    .await;
                ConfirmationOutcome::Confirmed
            }
            ConfirmAction::Cancel => {
                self.resolve(confirmation, Resolution::Cancelled, target)
                    .await;
                ConfirmationOutcome::Cancelled
            }
        }
    }

    async fn notify(&self, event: &ComponentEvent, confirmation_id: &str, content: &str) {
        if let Err(source) = self.transport.notify(&event.interaction, content).await {
            warn!(?source, confirmation_id, "failed to send confirmation notice");
        }
    }
}
