//! Cancellable repeating timer.
//!
//! [`PeriodicTask`] owns a tokio interval loop. Each tick spawns its work
//! detached, so a slow request never delays the next tick. Cancelling the
//! task stops the loop and drops any work still in flight; no tick callback
//! runs after [`PeriodicTask::cancel`] returns.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Smallest period a task will run at.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// When the first tick fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstTick {
    /// Right away, then every period.
    Immediate,
    /// After one full period.
    AfterPeriod,
}

/// A repeating timer that can be stopped synchronously.
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Starts calling `on_tick` every `period`.
    ///
    /// The task is a child of `parent`: cancelling `parent` cancels it too.
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(
        name: &'static str,
        period: Duration,
        first: FirstTick,
        parent: &CancellationToken,
        mut on_tick: F,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let token = parent.child_token();
        let loop_token = token.clone();

        let handle = tokio::spawn(async move {
            let start = match first {
                FirstTick::Immediate => Instant::now(),
                FirstTick::AfterPeriod => Instant::now() + period,
            };
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = loop_token.cancelled() => break,
                    _ = ticker.tick() => {
                        spawn_guarded(&loop_token, on_tick());
                    }
                }
            }
            tracing::trace!(task = name, "periodic task stopped");
        });

        Self {
            name,
            token,
            handle,
        }
    }

    /// Stops the timer and drops in-flight tick work.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::trace!(task = self.name, "cancelling periodic task");
        }
        self.token.cancel();
        self.handle.abort();
    }

    /// Returns `true` once the task has been cancelled, directly or through
    /// its parent token.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Task name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs `work` detached until it completes or `token` is cancelled.
pub fn spawn_guarded<Fut>(token: &CancellationToken, work: Fut)
where
    Fut: Future<Output = ()> + Send + 'static,
{
    let token = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            biased;
            () = token.cancelled() => {}
            () = work => {}
        }
    });
}
