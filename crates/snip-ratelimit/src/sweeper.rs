use crate::clock::Clock;
use crate::registry::RateLimiterRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a background task that periodically evicts idle clients.
///
/// Call [`Sweeper::shutdown`] to stop it cleanly. Dropping the handle aborts
/// the task instead.
#[derive(Debug)]
pub struct Sweeper {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Sweeper {
    pub(crate) fn spawn<C: Clock>(registry: Arc<RateLimiterRegistry<C>>, every: Duration) -> Self {
        let every = every.max(MIN_INTERVAL);
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;

            debug!(interval = ?every, "rate limiter sweeper started");
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let evicted = registry.sweep();
                        if evicted > 0 {
                            info!(
                                evicted,
                                remaining = registry.tracked_clients(),
                                "evicted idle rate limit clients"
                            );
                        }
                    }
                }
            }
            debug!("rate limiter sweeper stopped");
        });

        Self {
            stop: Some(stop),
            task: Some(task),
        }
    }

    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            // the task may already be gone, nothing to signal then
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "rate limiter sweeper ended abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
