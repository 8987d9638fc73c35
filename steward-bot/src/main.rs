use std::env;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use steward_commands::{handle_interaction, handle_message};
use steward_core::Context;
use steward_utils::{
    clock::SystemClock, config::SessionConfig, engine::SessionEngine, respond::HttpTransport,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let config = SessionConfig::from_env();

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));
    let sessions = Arc::new(SessionEngine::start(
        &config,
        Arc::new(SystemClock),
        Arc::new(HttpTransport::new(Arc::clone(&http))),
    ));
    let ctx = Context::new(Arc::clone(&http), Arc::clone(&sessions));

    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Steward is connecting...");

    tokio::select! {
        () = run_shard(&mut shard, ctx) => warn!("gateway event stream ended"),
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("shutdown signal received");
        }
    }

    match Arc::try_unwrap(sessions) {
        Ok(engine) => engine.shutdown().await,
        Err(_) => warn!("session engine still shared at shutdown; sweeper aborted on drop"),
    }

    Ok(())
}

async fn run_shard(shard: &mut Shard, ctx: Context) {
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(_) => {
                info!("Steward has successfully awoken!");
            }
            Event::MessageCreate(msg) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        error!(?source, "message command failed");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_interaction(ctx, interaction).await {
                        error!(?source, "interaction handling failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }
}
