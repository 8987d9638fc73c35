//! Wiring for the interactive-session subsystems.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    clock::Clock,
    config::SessionConfig,
    confirmation::{ConfirmationManager, ConfirmationOutcome},
    custom_id::Subsystem,
    event::ComponentEvent,
    pagination::{PaginationOutcome, Paginator},
    sweeper::Sweeper,
    transport::Transport,
};

/// Paginator and confirmation manager sharing one clock, one transport and
/// one background sweeper.
pub struct SessionEngine {
    paginator: Arc<Paginator>,
    confirmations: Arc<ConfirmationManager>,
    sweeper: Sweeper,
}

impl SessionEngine {
    /// Build both subsystems and start the periodic expiry sweep.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let paginator = Arc::new(Paginator::new(
            config,
            Arc::clone(&clock),
            Arc::clone(&transport),
        ));
        let confirmations = Arc::new(ConfirmationManager::new(config, clock, transport));

        let sweeper = {
            let paginator = Arc::clone(&paginator);
            let confirmations = Arc::clone(&confirmations);

            Sweeper::spawn(config.sweep_interval, move || {
                let paginator = Arc::clone(&paginator);
                let confirmations = Arc::clone(&confirmations);

                async move {
                    let pages = paginator.sweep().await;
                    let prompts = confirmations.sweep().await;
                    if pages + prompts > 0 {
                        debug!(pages, prompts, "session sweep finished");
                    }
                }
            })
        };

        info!(
            sweep_interval_secs = config.sweep_interval.as_secs(),
            "session engine started"
        );

        Self {
            paginator,
            confirmations,
            sweeper,
        }
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn confirmations(&self) -> &ConfirmationManager {
        &self.confirmations
    }

    /// Route a component interaction to the subsystem named by its custom-id
    /// prefix. Returns `false` when neither subsystem claims it.
    pub async fn dispatch(&self, event: &ComponentEvent) -> bool {
        match Subsystem::resolve(&event.custom_id) {
            Some(Subsystem::Paginator) => {
                self.paginator.handle(event).await != PaginationOutcome::NotForPaginator
            }
            Some(Subsystem::Confirmation) => {
                self.confirmations.handle(event).await != ConfirmationOutcome::NotForConfirmation
            }
            None => false,
        }
    }

    /// Stop the background sweep.
    pub async fn shutdown(self) {
        self.sweeper.shutdown().await;
        info!("session engine stopped");
    }
}
