//! Periodic refresh with deterministic teardown.
//!
//! # Usage
//!
//! ```rust,no_run
//! # async fn demo(console: assetry_console::Console) {
//! use assetry_core::model::ComplianceCheck;
//! use std::time::Duration;
//!
//! let task = console.schedule_refresh::<ComplianceCheck>(Duration::from_secs(300));
//! // ... later
//! drop(task); // no further refreshes, in-flight results are discarded
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::console::{Console, Refresh};
use crate::stores::Tracked;

/// Shortest period a [`ScheduledTask`] will run at.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// Liveness
// ============================================================================

/// Owner-side flag saying whether results are still wanted.
///
/// Disposed explicitly or on drop. Tokens handed out earlier observe the
/// change even after the owner is gone.
pub struct Liveness {
    tx: watch::Sender<bool>,
}

impl Liveness {
    /// A live owner.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self { tx }
    }

    /// A token observing this owner.
    pub fn token(&self) -> LiveToken {
        LiveToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Marks the owner gone.
    pub fn dispose(&self) {
        self.tx.send_replace(false);
    }

    /// Returns `true` until disposed.
    pub fn is_alive(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.tx.send_replace(false);
    }
}

impl fmt::Debug for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Liveness")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Observer side of a [`Liveness`].
#[derive(Clone, Debug)]
pub struct LiveToken {
    rx: watch::Receiver<bool>,
}

impl LiveToken {
    /// Returns `true` while the owner wants results.
    pub fn is_alive(&self) -> bool {
        *self.rx.borrow()
    }
}

// ============================================================================
// ScheduledTask
// ============================================================================

/// A cancelable interval job.
///
/// The first run happens one period after start. Dropping the task disposes
/// its liveness and aborts the job, so no run starts afterwards and a run in
/// flight discards its result.
pub struct ScheduledTask {
    name: String,
    period: Duration,
    liveness: Liveness,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Starts running `job` every `period` on the current tokio runtime.
    pub fn every<F, Fut>(name: impl Into<String>, period: Duration, mut job: F) -> Self
    where
        F: FnMut(LiveToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let period = period.max(MIN_PERIOD);
        let liveness = Liveness::new();
        let token = liveness.token();
        let task_name = name.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;
            loop {
                interval.tick().await;
                if !token.is_alive() {
                    break;
                }
                tracing::trace!(task = %task_name, "Scheduled run");
                job(token.clone()).await;
            }
        });
        tracing::debug!(task = %name, ?period, "Scheduled task started");
        Self {
            name,
            period,
            liveness,
            handle,
        }
    }

    /// Task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stops the task now. Same as dropping it.
    pub fn cancel(self) {}
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.liveness.dispose();
        self.handle.abort();
        tracing::debug!(task = %self.name, "Scheduled task stopped");
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("name", &self.name)
            .field("period", &self.period)
            .finish()
    }
}

impl Console {
    /// Refreshes `E`, dropping the result if `token`'s owner was disposed
    /// while the fetch was in flight.
    pub async fn refresh_live<E: Tracked>(&self, token: &LiveToken) -> Refresh {
        let fetched = self.gateway().list::<E>().await;
        self.store_fetched(fetched, || token.is_alive()).await
    }

    /// Refreshes `E` every `period` until the returned task is dropped.
    pub fn schedule_refresh<E: Tracked>(&self, period: Duration) -> ScheduledTask {
        let console = self.clone();
        ScheduledTask::every(format!("refresh-{}", E::KIND), period, move |token| {
            let console = console.clone();
            async move {
                console.refresh_live::<E>(&token).await;
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assetry_client::{Gateway, MemoryStore, RemoteStore};
    use assetry_core::model::{ComplianceCheck, License};
    use assetry_storage::MemoryCache;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn console() -> (Arc<MemoryStore>, Console) {
        let store = Arc::new(MemoryStore::new());
        let remote: Arc<dyn RemoteStore> = store.clone();
        (
            store,
            Console::new(Gateway::new(remote), Arc::new(MemoryCache::new())),
        )
    }

    #[test]
    fn test_liveness_outlives_owner() {
        let owner = Liveness::new();
        let token = owner.token();
        assert!(token.is_alive());
        drop(owner);
        assert!(!token.is_alive());
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_each_period_until_dropped() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let task = ScheduledTask::every("count", Duration::from_secs(10), move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(26)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        drop(task);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_period_is_clamped() {
        let task = ScheduledTask::every("fast", Duration::ZERO, |_| async {});
        assert_eq!(task.period(), MIN_PERIOD);
        assert_eq!(task.name(), "fast");
    }

    #[tokio::test]
    async fn test_disposed_owner_discards_result() {
        let (store, console) = console();
        store.seed("licenses", [json!({"id": "l-1", "name": "IDE"})]);
        let owner = Liveness::new();
        let token = owner.token();
        owner.dispose();

        let outcome = console.refresh_live::<License>(&token).await;
        assert_eq!(outcome, Refresh::Discarded);
        assert!(console.list::<License>().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_refresh_picks_up_remote_changes() {
        let (store, console) = console();
        let task = console.schedule_refresh::<ComplianceCheck>(Duration::from_secs(60));
        store.seed(
            "compliance_checks",
            [json!({"id": "c-1", "type": "Encryption", "status": "Compliant"})],
        );

        tokio::time::sleep(Duration::from_secs(61)).await;
        let checks = console.list::<ComplianceCheck>().await;
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].check_type, "Encryption");

        drop(task);
        let calls = store.calls();
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(store.calls(), calls);
    }
}
