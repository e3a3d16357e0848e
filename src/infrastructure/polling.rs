//! Fixed-interval background refresh.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

/// Runs a task every `period` until stopped or dropped.
///
/// The first run happens immediately. A run that is still in flight when the
/// poller is stopped is cancelled, so nothing is delivered after teardown.
pub struct Poller {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawns the polling loop on the current tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        debug!(poller = name, period_secs = period.as_secs(), "Starting poller");

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                task().await;
            }
        });

        Self { name, handle }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        if !self.handle.is_finished() {
            debug!(poller = self.name, "Stopping poller");
            self.handle.abort();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
