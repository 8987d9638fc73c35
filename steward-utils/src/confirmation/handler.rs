use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::transport::{MessagePayload, ResponseTarget, Transport};

/// Text rendered when a confirmation is cancelled without a custom handler.
pub const CONFIRMATION_CANCELLED_MESSAGE: &str = "Cancelled.";
/// Text rendered on the prompt when a callback fails.
pub const CONFIRMATION_FAILED_MESSAGE: &str = "Something went wrong while completing this action.";
/// Text rendered on the prompt once it can no longer be answered.
pub const CONFIRMATION_TIMED_OUT_MESSAGE: &str = "This confirmation timed out.";

/// How a confirmation ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
    Confirmed,
    Cancelled,
    Expired,
}

/// Everything a confirmation callback may act on besides its data.
pub struct ConfirmationContext {
    pub confirmation_id: String,
    pub confirmation_type: String,
    pub user_id: u64,
    pub guild_id: Option<u64>,
    /// Where to render the outcome. `None` when the prompt's location is
    /// unknown and no interaction is waiting for an answer.
    pub target: Option<ResponseTarget>,
    pub transport: Arc<dyn Transport>,
}

impl ConfirmationContext {
    /// Replace the prompt message, if there is one to replace.
    pub async fn reply(&self, payload: &MessagePayload) -> anyhow::Result<()> {
        match &self.target {
            Some(target) => self.transport.update(target, payload).await,
            None => Ok(()),
        }
    }
}

/// Confirm/cancel/expire behavior attached to a confirmation.
///
/// Exactly one of the three methods runs per confirmation.
#[async_trait]
pub trait ConfirmationHandler<D: Send + 'static>: Send + Sync + 'static {
    async fn on_confirm(&self, ctx: &ConfirmationContext, data: D) -> anyhow::Result<()>;

    async fn on_cancel(&self, ctx: &ConfirmationContext, _data: D) -> anyhow::Result<()> {
        ctx.reply(&MessagePayload::text(CONFIRMATION_CANCELLED_MESSAGE))
            .await
    }

    async fn on_expire(&self, ctx: &ConfirmationContext, _data: D) -> anyhow::Result<()> {
        ctx.reply(&MessagePayload::text(CONFIRMATION_TIMED_OUT_MESSAGE))
            .await
    }
}

/// Type-erased handler and data, consumed by the single resolution.
pub(crate) trait Pending: Send {
    fn resolve(
        self: Box<Self>,
        resolution: Resolution,
        ctx: ConfirmationContext,
    ) -> BoxFuture<'static, anyhow::Result<()>>;
}

pub(crate) struct Bound<D, H> {
    pub(crate) data: D,
    pub(crate) handler: H,
}

impl<D, H> Pending for Bound<D, H>
where
    D: Send + 'static,
    H: ConfirmationHandler<D>,
{
    fn resolve(
        self: Box<Self>,
        resolution: Resolution,
        ctx: ConfirmationContext,
    ) -> BoxFuture<'static, anyhow::Result<()>> {
        let Bound { data, handler } = *self;

        Box::pin(async move {
            match resolution {
                Resolution::Confirmed => handler.on_confirm(&ctx, data).await,
                Resolution::Cancelled => handler.on_cancel(&ctx, data).await,
                Resolution::Expired => handler.on_expire(&ctx, data).await,
            }
        })
    }
}
