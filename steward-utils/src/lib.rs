/// Injectable wall-clock source.
pub mod clock;
/// Session timeouts loaded from the environment.
pub mod config;
/// One-shot confirm/cancel prompts.
pub mod confirmation;
/// Prefixed custom-id encoding shared by every subsystem.
pub mod custom_id;
/// Generic embed builders shared across commands.
pub mod embed;
/// Subsystem wiring and interaction dispatch.
pub mod engine;
/// Normalized component and modal interactions.
pub mod event;
/// Button-driven pagination sessions.
pub mod pagination;
/// Permission helper utilities.
pub mod permissions;
/// Twilight-backed message transport.
pub mod respond;
/// In-memory keyed session storage.
pub mod store;
/// Periodic background sweep task.
pub mod sweeper;
/// Outbound message abstraction.
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';

/// Ephemeral notice when an interaction carries no acting user.
pub const UNKNOWN_USER_MESSAGE: &str = "Unable to determine interaction user.";
