use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    guild::Permissions,
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};

use crate::CommandMeta;
use steward_core::Context;
use steward_utils::{
    confirmation::{ConfirmationContext, ConfirmationHandler, ConfirmationRequest},
    permissions::has_message_permission,
    transport::{MessagePayload, ResponseTarget},
};

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    desc: "Delete the latest messages in this channel after confirmation.",
    category: "moderation",
    usage: "!purge <amount>",
};

const MAX_PURGE: u16 = 100;

/// Why an amount argument was rejected; the text is shown to the user.
#[derive(Debug, PartialEq, Eq)]
enum AmountError {
    Missing,
    NotANumber,
    Zero,
}

impl AmountError {
    fn message(&self) -> String {
        match self {
            Self::Missing => format!("Usage: `{}`", META.usage),
            Self::NotANumber => format!("Amount must be a number between 1 and {MAX_PURGE}."),
            Self::Zero => "Amount must be at least 1.".to_owned(),
        }
    }
}

/// Parse the requested amount, capping it at the bulk-delete limit.
fn parse_amount(arg1: Option<&str>) -> Result<u16, AmountError> {
    let raw = arg1.ok_or(AmountError::Missing)?;
    let requested = raw.parse::<u16>().map_err(|_| AmountError::NotANumber)?;

    if requested == 0 {
        return Err(AmountError::Zero);
    }

    Ok(requested.min(MAX_PURGE))
}

/// What a confirmed purge deletes.
#[derive(Clone, Copy, Debug)]
struct PurgeRequest {
    channel_id: Id<ChannelMarker>,
    /// The `!purge` message itself; deleted along with the messages before it,
    /// so at most `MAX_PURGE - 1` earlier messages fit in one bulk delete.
    command_message_id: Id<MessageMarker>,
    amount: u16,
}

struct PurgeHandler {
    http: Arc<Client>,
}

#[async_trait]
impl ConfirmationHandler<PurgeRequest> for PurgeHandler {
    async fn on_confirm(
        &self,
        ctx: &ConfirmationContext,
        request: PurgeRequest,
    ) -> anyhow::Result<()> {
        let messages = self
            .http
            .channel_messages(request.channel_id)
            .before(request.command_message_id)
            .limit(request.amount.min(MAX_PURGE - 1))
            .await?
            .model()
            .await?;

        let mut ids: Vec<Id<MessageMarker>> = messages.into_iter().map(|m| m.id).collect();
        let purged = ids.len();
        ids.push(request.command_message_id);

        let delete_result = if let [id] = ids.as_slice() {
            self.http.delete_message(request.channel_id, *id).await
        } else {
            self.http.delete_messages(request.channel_id, &ids).await
        };

        if let Err(source) = delete_result {
            error!(?source, confirmation_id = %ctx.confirmation_id, "purge delete request failed");
            return ctx
                .reply(&MessagePayload::text(
                    "I couldn't delete messages. I likely need the 'Manage Messages' permission.",
                ))
                .await;
        }

        info!(
            channel_id = request.channel_id.get(),
            purged,
            user_id = ctx.user_id,
            "purge completed"
        );

        ctx.reply(&MessagePayload::text(purged_message(purged)))
            .await
    }
}

fn purged_message(purged: usize) -> String {
    match purged {
        0 => "No messages found to delete.".to_owned(),
        purged => format!("Purged {purged} message(s)."),
    }
}

/// Ask for confirmation, then delete a bounded number of recent messages.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;

    let amount = match parse_amount(arg1) {
        Ok(amount) => amount,
        Err(reason) => {
            http.create_message(msg.channel_id)
                .content(&reason.message())
                .await?;
            return Ok(());
        }
    };

    if !has_message_permission(http, &msg, Permissions::MANAGE_MESSAGES).await? {
        http.create_message(msg.channel_id)
            .content("You are not permitted to use this command.")
            .await?;
        return Ok(());
    }

    let data = PurgeRequest {
        channel_id: msg.channel_id,
        command_message_id: msg.id,
        amount,
    };
    let handler = PurgeHandler {
        http: Arc::clone(&ctx.http),
    };
    let prompt = MessagePayload::text(format!(
        "Delete the last {amount} message(s) in this channel?"
    ));

    let mut request = ConfirmationRequest::new("purge", msg.author.id.get(), prompt, data, handler);
    if let Some(guild_id) = msg.guild_id {
        request = request.guild(guild_id.get());
    }

    ctx.sessions
        .confirmations()
        .request(&ResponseTarget::Channel(msg.channel_id), request)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_is_validated_and_capped() {
        assert_eq!(parse_amount(Some("25")), Ok(25));
        assert_eq!(parse_amount(Some("500")), Ok(MAX_PURGE));
        assert_eq!(parse_amount(Some("0")), Err(AmountError::Zero));
        assert_eq!(parse_amount(Some("many")), Err(AmountError::NotANumber));
        assert_eq!(parse_amount(None), Err(AmountError::Missing));
    }

    #[test]
    fn rejection_messages_are_user_facing() {
        assert_eq!(AmountError::Missing.message(), "Usage: `!purge <amount>`");
        assert_eq!(
            AmountError::NotANumber.message(),
            "Amount must be a number between 1 and 100."
        );
    }

    #[test]
    fn summary_reports_deleted_count() {
        assert_eq!(purged_message(0), "No messages found to delete.");
        assert_eq!(purged_message(12), "Purged 12 message(s).");
    }
}
