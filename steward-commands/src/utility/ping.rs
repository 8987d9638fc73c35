use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use steward_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Replies with Pong! and the number of live sessions.",
    category: "utility",
    usage: "!ping",
};

fn pong(pages: usize, prompts: usize) -> String {
    format!("Pong! Live sessions: {pages} paginated, {prompts} awaiting confirmation.")
}

/// Send a simple connectivity response.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let content = pong(
        ctx.sessions.paginator().live_sessions(),
        ctx.sessions.confirmations().pending_count(),
    );
    ctx.http.create_message(msg.channel_id).content(&content).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_session_counts() {
        assert_eq!(
            pong(2, 0),
            "Pong! Live sessions: 2 paginated, 0 awaiting confirmation."
        );
    }
}
