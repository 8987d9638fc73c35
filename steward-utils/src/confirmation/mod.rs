//! One-shot confirm/cancel prompts with caller-supplied callbacks.

mod components;
mod handler;
mod interaction;

use std::{fmt, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};

pub use components::build_confirmation_components;
pub use handler::{
    CONFIRMATION_CANCELLED_MESSAGE, CONFIRMATION_FAILED_MESSAGE, CONFIRMATION_TIMED_OUT_MESSAGE,
    ConfirmationContext, ConfirmationHandler, Resolution,
};
pub use interaction::ConfirmationOutcome;

use handler::{Bound, Pending};

use crate::{
    clock::Clock,
    config::SessionConfig,
    store::{Entry, SessionRecord, SessionStore},
    transport::{MessagePayload, MessageRef, ResponseTarget, Transport},
};

/// Ephemeral notice for clicks on a missing or expired confirmation.
pub const CONFIRMATION_EXPIRED_MESSAGE: &str =
    "This confirmation has expired. Run the command again.";
/// Ephemeral notice for clicks by someone other than the requester.
pub const CONFIRMATION_WRONG_USER_MESSAGE: &str =
    "Only the user who started this action can confirm or cancel it.";

/// A pending confirmation awaiting its single resolution.
pub struct Confirmation {
    pub id: String,
    /// Category label used in logs.
    pub confirmation_type: String,
    pub user_id: u64,
    pub guild_id: Option<u64>,
    pub expires_at: DateTime<Utc>,
    pub message: Option<MessageRef>,
    pending: Box<dyn Pending>,
}

impl fmt::Debug for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Confirmation")
            .field("id", &self.id)
            .field("confirmation_type", &self.confirmation_type)
            .field("user_id", &self.user_id)
            .field("guild_id", &self.guild_id)
            .field("expires_at", &self.expires_at)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl SessionRecord for Confirmation {
    fn id(&self) -> &str {
        &self.id
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Caller input for a new confirmation.
pub struct ConfirmationRequest<D, H> {
    pub confirmation_type: String,
    pub user_id: u64,
    pub guild_id: Option<u64>,
    /// Prompt body; the confirm/cancel row is appended when rendered.
    pub prompt: MessagePayload,
    pub data: D,
    pub handler: H,
    /// Overrides the configured timeout.
    pub expires_in: Option<Duration>,
}

impl<D, H> ConfirmationRequest<D, H>
where
    D: Send + 'static,
    H: ConfirmationHandler<D>,
{
    pub fn new(
        confirmation_type: impl Into<String>,
        user_id: u64,
        prompt: MessagePayload,
        data: D,
        handler: H,
    ) -> Self {
        Self {
            confirmation_type: confirmation_type.into(),
            user_id,
            guild_id: None,
            prompt,
            data,
            handler,
            expires_in: None,
        }
    }

    pub fn guild(mut self, guild_id: u64) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    pub fn expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }
}

/// Owner of every pending confirmation.
pub struct ConfirmationManager {
    store: SessionStore<Confirmation>,
    clock: Arc<dyn Clock>,
    transport: Arc<dyn Transport>,
    ttl: Duration,
}

impl ConfirmationManager {
    pub fn new(
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            clock,
            transport,
            ttl: config.confirmation_ttl,
        }
    }

    /// Register a confirmation and render its prompt. Returns the id and the
    /// payload carrying the confirm/cancel buttons.
    pub fn register<D, H>(&self, request: ConfirmationRequest<D, H>) -> (String, MessagePayload)
    where
        D: Send + 'static,
        H: ConfirmationHandler<D>,
    {
        let ConfirmationRequest {
            confirmation_type,
            user_id,
            guild_id,
            mut prompt,
            data,
            handler,
            expires_in,
        } = request;

        let expires_at = self.clock.now() + expires_in.unwrap_or(self.ttl);

        let id = self.store.insert_new(|id| Confirmation {
            id,
            confirmation_type: confirmation_type.clone(),
            user_id,
            guild_id,
            expires_at,
            message: None,
            pending: Box::new(Bound { data, handler }),
        });

        prompt.components = build_confirmation_components(&id);
        debug!(confirmation_id = %id, %confirmation_type, "confirmation created");

        (id, prompt)
    }

    /// Register a confirmation and send its prompt to `target`.
    ///
    /// If the prompt cannot be delivered the confirmation is discarded
    /// without running any callback and the error is returned.
    pub async fn request<D, H>(
        &self,
        target: &ResponseTarget,
        request: ConfirmationRequest<D, H>,
    ) -> anyhow::Result<String>
    where
        D: Send + 'static,
        H: ConfirmationHandler<D>,
    {
        let (id, prompt) = self.register(request);

        match self.transport.send(target, &prompt).await {
            Ok(Some(message)) => {
                self.store.modify(&id, |confirmation| {
                    confirmation.message = Some(message);
                    Entry::Keep(())
                });
                Ok(id)
            }
            Ok(None) => Ok(id),
            Err(source) => {
                self.store.delete(&id);
                Err(source)
            }
        }
    }

    pub fn is_pending(&self, confirmation_id: &str) -> bool {
        self.store.contains(confirmation_id)
    }

    pub fn pending_count(&self) -> usize {
        self.store.len()
    }

    /// Expire overdue confirmations using the injected clock.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(self.clock.now()).await
    }

    /// Remove confirmations expired at `now`, running each one's expiry
    /// callback once. Returns how many were removed.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let expired = self.store.sweep_expired(now);
        let removed = expired.len();

        for confirmation in expired {
            let target = confirmation.message.map(ResponseTarget::Message);
            self.resolve(confirmation, Resolution::Expired, target).await;
        }

        if removed > 0 {
            debug!(removed, "swept expired confirmations");
        }

        removed
    }

    /// Run the one resolution of a record already removed from the store.
    ///
    /// A failed callback still leaves the prompt inert: the failure notice
    /// replaces it without components.
    async fn resolve(
        &self,
        confirmation: Confirmation,
        resolution: Resolution,
        target: Option<ResponseTarget>,
    ) {
        let Confirmation {
            id,
            confirmation_type,
            user_id,
            guild_id,
            pending,
            ..
        } = confirmation;

        let ctx = ConfirmationContext {
            confirmation_id: id.clone(),
            confirmation_type: confirmation_type.clone(),
            user_id,
            guild_id,
            target: target.clone(),
            transport: Arc::clone(&self.transport),
        };

        match pending.resolve(resolution, ctx).await {
            Ok(()) => info!(
                confirmation_id = %id,
                %confirmation_type,
                ?resolution,
                "confirmation resolved"
            ),
            Err(source) => {
                error!(
                    ?source,
                    confirmation_id = %id,
                    %confirmation_type,
                    ?resolution,
                    "confirmation callback failed"
                );

                let Some(target) = target else {
                    return;
                };

                let notice = MessagePayload::text(CONFIRMATION_FAILED_MESSAGE);
                if let Err(source) = self.transport.update(&target, &notice).await {
                    warn!(?source, confirmation_id = %id, "failed to render confirmation failure");
                }
            }
        }
    }
}
