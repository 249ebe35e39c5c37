/*!
 * Contention Statistics
 *
 * Lock-free counters every primitive keeps about its own admission traffic,
 * plus the instrument that wraps blocking calls with tracing and timing.
 */

use crate::config::SyncConfig;
use crate::errors::{SyncError, SyncResult};
use crate::wait::{deadline_after, WaitOutcome, WaitQueue};
use parking_lot::MutexGuard;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Per-primitive counters
///
/// All counters are `Relaxed`: they are diagnostics, never used for
/// admission decisions.
#[derive(Debug, Default)]
pub struct SyncStats {
    acquisitions: AtomicU64,
    contended: AtomicU64,
    timeouts: AtomicU64,
    rejected_releases: AtomicU64,
    blocked_micros: AtomicU64,
    peak_waiters: AtomicU64,
}

/// Point-in-time copy of `SyncStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Successful acquires/waits, blocking or not
    pub acquisitions: u64,
    /// Calls that had to enter the wait queue
    pub contended: u64,
    /// Calls that left the wait queue on deadline expiry
    pub timeouts: u64,
    /// Releases rejected with an ownership or over-release error
    pub rejected_releases: u64,
    /// Total time spent suspended
    pub blocked_micros: u64,
    /// Largest wait queue length observed
    pub peak_waiters: u64,
}

impl StatsSnapshot {
    /// Mean suspension time of contended calls
    pub fn avg_blocked_micros(&self) -> u64 {
        if self.contended == 0 {
            0
        } else {
            self.blocked_micros / self.contended
        }
    }
}

impl SyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_acquire(&self) {
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejected_release(&self) {
        self.rejected_releases.fetch_add(1, Ordering::Relaxed);
    }

    fn record_blocked(&self, waited: Duration, timed_out: bool) {
        self.contended.fetch_add(1, Ordering::Relaxed);
        self.blocked_micros.fetch_add(waited.as_micros() as u64, Ordering::Relaxed);
        if timed_out {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn observe_waiters(&self, waiters: usize) {
        self.peak_waiters.fetch_max(waiters as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            acquisitions: self.acquisitions.load(Ordering::Relaxed),
            contended: self.contended.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            rejected_releases: self.rejected_releases.load(Ordering::Relaxed),
            blocked_micros: self.blocked_micros.load(Ordering::Relaxed),
            peak_waiters: self.peak_waiters.load(Ordering::Relaxed),
        }
    }
}

/// Configuration, counters, and tracing context shared by a primitive's
/// blocking paths
#[derive(Debug)]
pub(crate) struct Instrument {
    resource: &'static str,
    config: SyncConfig,
    stats: SyncStats,
}

impl Instrument {
    pub(crate) fn new(resource: &'static str, config: SyncConfig) -> Self {
        Self {
            resource,
            config,
            stats: SyncStats::new(),
        }
    }

    #[inline]
    pub(crate) fn resource(&self) -> &'static str {
        self.resource
    }

    #[inline]
    pub(crate) fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Suspend the caller in the primitive's wait queue
    ///
    /// Returns `Ok(())` once a waker has handed the caller admission, or
    /// `TimedOut` after the entry has been removed from the queue.
    pub(crate) fn block<T, F>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        queue: F,
        timeout: Option<Duration>,
    ) -> SyncResult<()>
    where
        F: Fn(&mut T) -> &mut WaitQueue,
    {
        let deadline = deadline_after(self.config.effective_timeout(timeout));

        // An already-expired deadline never joins the queue, so it counts as
        // neither contention nor a timeout
        if deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(SyncError::TimedOut {
                waited: Duration::ZERO,
            });
        }

        let waiters = queue(&mut **guard).len() + 1;
        self.stats.observe_waiters(waiters);
        debug!(resource = self.resource, waiters, "contended, blocking caller");

        let start = Instant::now();
        let outcome = WaitQueue::enqueue_and_block(guard, queue, deadline);
        let waited = start.elapsed();
        self.stats.record_blocked(waited, outcome == WaitOutcome::TimedOut);

        match outcome {
            WaitOutcome::Woken => {
                if waited >= self.config.slow_wait_threshold {
                    warn!(
                        resource = self.resource,
                        waited_micros = waited.as_micros() as u64,
                        "slow wait"
                    );
                }
                Ok(())
            }
            WaitOutcome::TimedOut => {
                debug!(
                    resource = self.resource,
                    waited_micros = waited.as_micros() as u64,
                    "wait timed out"
                );
                Err(SyncError::TimedOut { waited })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_snapshot_counts() {
        let stats = SyncStats::new();
        stats.record_acquire();
        stats.record_acquire();
        stats.record_rejected_release();
        stats.record_blocked(Duration::from_micros(40), false);
        stats.record_blocked(Duration::from_micros(20), true);
        stats.observe_waiters(3);
        stats.observe_waiters(1);

        let snap = stats.snapshot();
        assert_eq!(snap.acquisitions, 2);
        assert_eq!(snap.rejected_releases, 1);
        assert_eq!(snap.contended, 2);
        assert_eq!(snap.timeouts, 1);
        assert_eq!(snap.peak_waiters, 3);
        assert_eq!(snap.avg_blocked_micros(), 30);
    }

    #[test]
    fn test_instrument_block_times_out() {
        let instrument = Instrument::new("test", SyncConfig::relaxed());
        let state = Mutex::new(WaitQueue::new());
        let mut guard = state.lock();

        let timeout = Some(Duration::from_millis(10));
        let result = instrument.block(&mut guard, |q: &mut WaitQueue| q, timeout);

        assert!(matches!(result, Err(SyncError::TimedOut { .. })));
        assert!(guard.is_empty());
        assert_eq!(instrument.stats().snapshot().timeouts, 1);
    }

    #[test]
    fn test_expired_deadline_records_nothing() {
        let instrument = Instrument::new("test", SyncConfig::relaxed());
        let state = Mutex::new(WaitQueue::new());
        let mut guard = state.lock();

        let result = instrument.block(&mut guard, |q: &mut WaitQueue| q, Some(Duration::ZERO));

        assert_eq!(
            result,
            Err(SyncError::TimedOut {
                waited: Duration::ZERO
            })
        );
        assert!(guard.is_empty());
        assert_eq!(instrument.stats().snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_instrument_uses_default_timeout() {
        let config = SyncConfig::relaxed().with_default_timeout(Duration::from_millis(5));
        let instrument = Instrument::new("test", config);
        let state = Mutex::new(WaitQueue::new());
        let mut guard = state.lock();

        let result = instrument.block(&mut guard, |q: &mut WaitQueue| q, None);
        assert!(result.unwrap_err().is_timeout());
    }
}
