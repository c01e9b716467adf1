//! Single-slot deferred execution.
//!
//! ## Learning: Cancellation by Replacement
//!
//! A [`DeferredSlot`] holds at most one pending task. Scheduling a new task
//! aborts the previous `JoinHandle` before storing the new one, so callers
//! never juggle timer handles themselves and pending work cannot pile up.
//!
//! Abort only takes effect at an `.await`. A task that already woke from its
//! sleep runs its closure to completion, which is why the controller also
//! tags each step with a generation number.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::{CoreResult, ViewError};

/// One cancellable timer channel.
pub struct DeferredSlot {
    channel: &'static str,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DeferredSlot {
    /// Creates a slot bound to the current tokio runtime.
    pub fn new(channel: &'static str) -> CoreResult<Self> {
        let runtime = Handle::try_current().map_err(|_| ViewError::NoRuntime)?;
        Ok(Self::with_handle(channel, runtime))
    }

    pub fn with_handle(channel: &'static str, runtime: Handle) -> Self {
        Self {
            channel,
            runtime,
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `task` after `delay`, replacing anything pending.
    ///
    /// Returns true if a pending task was superseded.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });

        let superseded = match self.pending().replace(handle) {
            Some(previous) if !previous.is_finished() => {
                previous.abort();
                true
            }
            _ => false,
        };

        tracing::debug!(
            channel = self.channel,
            delay_ms = delay.as_millis() as u64,
            superseded,
            "scheduled deferred step"
        );
        superseded
    }

    /// Aborts the pending task, if any. Returns true if one was cancelled.
    pub fn cancel(&self) -> bool {
        match self.pending().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!(channel = self.channel, "cancelled deferred step");
                true
            }
            _ => false,
        }
    }

    /// Returns true while a scheduled task has not yet run.
    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }
}

impl Drop for DeferredSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
