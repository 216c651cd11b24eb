//! Debounced cache invalidation
//!
//! A burst of permission-change notifications (an admin editing several
//! role assignments, a reconnect replaying updates) would otherwise clear
//! the cache once per notification. The debouncer coalesces them: each
//! request replaces the pending timer, and the clear runs once after a
//! quiet period.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cache::PermissionCache;

/// Default quiet period before a scheduled clear fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(1);

/// A permission cache shared between its owning session and the debounce
/// timer task.
pub type SharedPermissionCache = Arc<Mutex<PermissionCache>>;

/// Create a shared cache handle.
pub fn shared_cache(cache: PermissionCache) -> SharedPermissionCache {
    Arc::new(Mutex::new(cache))
}

/// Coalesces rapid successive clear requests into a single clear.
///
/// The pending clear is an explicit cancellable task handle. Scheduling
/// replaces the previous timer, so the quiet period restarts on every
/// request; cancelling with nothing pending is a no-op. Cancel-then-spawn
/// runs under `&mut self`, so two competing pending clears cannot exist.
///
/// Must be used from within a tokio runtime.
pub struct ClearDebouncer {
    cache: SharedPermissionCache,
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl ClearDebouncer {
    /// Create a debouncer over a shared cache with the default quiet
    /// period.
    pub fn new(cache: SharedPermissionCache) -> Self {
        Self::with_quiet_period(cache, DEFAULT_QUIET_PERIOD)
    }

    /// Create a debouncer with an explicit quiet period.
    pub fn with_quiet_period(cache: SharedPermissionCache, quiet_period: Duration) -> Self {
        Self {
            cache,
            quiet_period,
            pending: None,
        }
    }

    /// Schedule a clear after the quiet period, replacing any pending one.
    pub fn schedule_clear(&mut self) {
        self.cancel_pending_clear();
        let cache = Arc::clone(&self.cache);
        let quiet_period = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if let Ok(mut cache) = cache.lock() {
                cache.clear();
                tracing::debug!("debounced permission cache clear fired");
            }
        }));
    }

    /// Cancel the pending clear, if any. Idempotent.
    pub fn cancel_pending_clear(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Check whether a clear is scheduled and has not fired yet.
    pub fn has_pending_clear(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ClearDebouncer {
    fn drop(&mut self) {
        self.cancel_pending_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_cache() -> SharedPermissionCache {
        let mut cache = PermissionCache::new();
        cache.set("risks:read", true);
        shared_cache(cache)
    }

    fn cache_len(cache: &SharedPermissionCache) -> usize {
        cache.lock().unwrap().len()
    }

    /// Let the timer task observe an advanced clock and run to completion.
    async fn advance(duration: Duration) {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        tokio::time::advance(duration).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_fires_after_quiet_period() {
        let cache = seeded_cache();
        let mut debouncer =
            ClearDebouncer::with_quiet_period(Arc::clone(&cache), Duration::from_secs(1));

        debouncer.schedule_clear();
        assert!(debouncer.has_pending_clear());

        advance(Duration::from_millis(500)).await;
        assert_eq!(cache_len(&cache), 1);

        advance(Duration::from_millis(600)).await;
        assert_eq!(cache_len(&cache), 0);
        assert!(!debouncer.has_pending_clear());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_restarts_quiet_period() {
        let cache = seeded_cache();
        let mut debouncer =
            ClearDebouncer::with_quiet_period(Arc::clone(&cache), Duration::from_secs(1));

        debouncer.schedule_clear();
        advance(Duration::from_millis(800)).await;
        // A second request inside the quiet period replaces the timer.
        debouncer.schedule_clear();
        advance(Duration::from_millis(800)).await;
        assert_eq!(cache_len(&cache), 1);

        advance(Duration::from_millis(300)).await;
        assert_eq!(cache_len(&cache), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_one_clear() {
        let cache = seeded_cache();
        let mut debouncer =
            ClearDebouncer::with_quiet_period(Arc::clone(&cache), Duration::from_secs(1));

        for _ in 0..10 {
            debouncer.schedule_clear();
            advance(Duration::from_millis(10)).await;
        }
        assert_eq!(cache_len(&cache), 1);

        advance(Duration::from_millis(1100)).await;
        assert_eq!(cache_len(&cache), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_clear() {
        let cache = seeded_cache();
        let mut debouncer =
            ClearDebouncer::with_quiet_period(Arc::clone(&cache), Duration::from_secs(1));

        debouncer.schedule_clear();
        debouncer.cancel_pending_clear();
        assert!(!debouncer.has_pending_clear());

        advance(Duration::from_secs(2)).await;
        assert_eq!(cache_len(&cache), 1);

        // Cancelling with nothing pending is safe.
        debouncer.cancel_pending_clear();
    }
}
