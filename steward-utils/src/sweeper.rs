use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;

/// Handle to a background task that runs a sweep on a fixed interval.
///
/// Dropping the handle aborts the task.
pub struct Sweeper {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn `sweep` every `every`. The first pass runs one period after
    /// start.
    pub fn spawn<F, Fut>(every: Duration, sweep: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);
        let sweep = Arc::new(sweep);

        let task = tokio::spawn(async move {
            let mut tick = interval(every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // `interval` completes its first tick immediately.
            tick.tick().await;

            loop {
                tokio::select! {
                    _ = tick.tick() => sweep().await,
                    _ = stopped.changed() => break,
                }
            }

            debug!("session sweeper stopped");
        });

        Self {
            stop,
            task: Some(task),
        }
    }

    /// Stop the loop and wait for an in-flight pass to finish.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting() -> (Arc<AtomicUsize>, impl Fn() -> std::future::Ready<()> + Send + Sync) {
        let passes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&passes);
        let sweep = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        };
        (passes, sweep)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_once_per_period() {
        let (passes, sweep) = counting();
        let sweeper = Sweeper::spawn(Duration::from_secs(30), sweep);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(passes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(85)).await;
        assert_eq!(passes.load(Ordering::SeqCst), 3);

        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_further_passes() {
        let (passes, sweep) = counting();
        let sweeper = Sweeper::spawn(Duration::from_secs(30), sweep);

        tokio::time::sleep(Duration::from_secs(31)).await;
        sweeper.shutdown().await;
        let after_shutdown = passes.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(after_shutdown, 1);
        assert_eq!(passes.load(Ordering::SeqCst), 1);
    }
}
