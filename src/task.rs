//! Cancellable fixed-period tasks
//!
//! A [`RepeatingTask`] runs an async tick on a tokio interval until its handle
//! is cancelled or dropped. Cancellation raises a shared flag and aborts the
//! task, so no tick body starts after `cancel()` returns. Ticks that read
//! shared state must re-check [`CancelFlag::is_cancelled`] while holding the
//! lock on that state.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct RepeatingTask {
    name: &'static str,
    cancelled: CancelFlag,
    handle: JoinHandle<()>,
}

impl RepeatingTask {
    /// Spawn `tick` every `period`; the first tick fires immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut(CancelFlag) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancelled = CancelFlag::default();
        let flag = cancelled.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // a stalled tick must not be followed by a burst of catch-up ticks
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if flag.is_cancelled() {
                    break;
                }
                tick(flag.clone()).await;
            }

            tracing::trace!("{} task exited", name);
        });

        tracing::debug!("{} task started (period={:?})", name, period);

        Self {
            name,
            cancelled,
            handle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the task; equivalent to dropping the handle
    pub fn cancel(self) {}
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.cancelled.cancel();
        self.handle.abort();
        tracing::debug!("{} task cancelled", self.name);
    }
}
