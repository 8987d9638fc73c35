pub mod moderation;
pub mod utility;

use tracing::debug;
use twilight_model::gateway::payload::incoming::{InteractionCreate, MessageCreate};

use steward_core::Context;
use steward_utils::{COMMAND_PREFIX, event::ComponentEvent};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    moderation::purge::META,
    // Add new commands here
];

/// Split a prefixed message into a lowercase command name, its first
/// argument and the remaining text.
fn parse_command(content: &str) -> Option<(String, Option<&str>, Option<&str>)> {
    let content = content.trim().strip_prefix(COMMAND_PREFIX)?.trim();

    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (arg1, arg_tail) = match rest {
        Some(value) => {
            let mut args = value.splitn(2, char::is_whitespace);
            let first = args.next().filter(|arg| !arg.is_empty());
            let tail = args
                .next()
                .map(str::trim)
                .filter(|remaining| !remaining.is_empty());

            (first, tail)
        }
        None => (None, None),
    };

    Some((cmd, arg1, arg_tail))
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content = msg.content.clone();
    let Some((cmd, arg1, _arg_tail)) = parse_command(&content) else {
        return Ok(());
    };

    match cmd.as_str() {
        "ping" => utility::ping::run(ctx, msg).await?,
        "help" => utility::help::run(ctx, msg, arg1).await?,
        "purge" => moderation::purge::run(ctx, msg, arg1).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

/// Hand component clicks and modal submissions to the session engine.
pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let Some(event) = ComponentEvent::from_interaction(&interaction) else {
        return Ok(());
    };

    if !ctx.sessions.dispatch(&event).await {
        debug!(custom_id = %event.custom_id, "interaction not claimed by any session");
    }

    Ok(())
}
