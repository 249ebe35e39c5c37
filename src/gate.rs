/*!
 * Counting Gate
 *
 * Bounded admission control: at most `max_permits` concurrent holders.
 *
 * # Design
 *
 * - Permits live in `[0, max_permits]`; a release that would push the
 *   count past the maximum fails with `OverRelease` and changes nothing.
 * - Admission is strictly FIFO. A release with waiters queued hands the
 *   permit straight to the earliest waiter instead of incrementing, so the
 *   count stays at zero while anyone is queued and `try_acquire` cannot
 *   barge ahead of them.
 * - No ownership check: any thread may release.
 */

use crate::config::SyncConfig;
use crate::errors::{SyncError, SyncResult};
use crate::guard::{Lockable, ScopedGuard};
use crate::stats::{Instrument, StatsSnapshot};
use crate::wait::WaitQueue;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::{trace, warn};

#[derive(Debug)]
struct GateState {
    permits: usize,
    queue: WaitQueue,
}

/// Counting semaphore for shared resources of fixed capacity
#[derive(Debug)]
pub struct CountingGate {
    state: Mutex<GateState>,
    max_permits: usize,
    instrument: Instrument,
}

impl CountingGate {
    /// Create a gate with `initial_permits` of `max_permits` available
    ///
    /// Fails with `InvalidPermits` unless `1 <= max` and `initial <= max`.
    pub fn new(initial_permits: usize, max_permits: usize) -> SyncResult<Self> {
        Self::with_config(initial_permits, max_permits, SyncConfig::default())
    }

    pub fn with_config(
        initial_permits: usize,
        max_permits: usize,
        config: SyncConfig,
    ) -> SyncResult<Self> {
        if max_permits == 0 || initial_permits > max_permits {
            return Err(SyncError::InvalidPermits {
                initial: initial_permits,
                max: max_permits,
            });
        }

        Ok(Self {
            state: Mutex::new(GateState {
                permits: initial_permits,
                queue: WaitQueue::new(),
            }),
            max_permits,
            instrument: Instrument::new("counting_gate", config),
        })
    }

    /// Take one permit, blocking while none are available
    pub fn acquire(&self, timeout: Option<Duration>) -> SyncResult<()> {
        let mut state = self.state.lock();

        if state.permits > 0 {
            state.permits -= 1;
            trace!(
                resource = self.instrument.resource(),
                remaining = state.permits,
                "permit taken"
            );
        } else {
            // Woken callers receive the releaser's permit directly
            self.instrument.block(&mut state, |s: &mut GateState| &mut s.queue, timeout)?;
        }

        self.instrument.stats().record_acquire();
        Ok(())
    }

    /// Take one permit only if one is free right now
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        if state.permits == 0 {
            return false;
        }
        state.permits -= 1;
        self.instrument.stats().record_acquire();
        true
    }

    /// Return one permit
    pub fn release(&self) -> SyncResult<()> {
        self.release_many(1)
    }

    /// Return `count` permits, waking one waiter per permit in FIFO order
    ///
    /// All-or-nothing: if the permits would exceed the maximum, nothing is
    /// released.
    pub fn release_many(&self, count: usize) -> SyncResult<()> {
        let mut state = self.state.lock();

        let within_max = state
            .permits
            .checked_add(count)
            .is_some_and(|total| total <= self.max_permits);
        if !within_max {
            self.instrument.stats().record_rejected_release();
            warn!(
                resource = self.instrument.resource(),
                permits = state.permits,
                count,
                max = self.max_permits,
                "over-release rejected"
            );
            return Err(SyncError::OverRelease {
                max_permits: self.max_permits,
            });
        }

        for _ in 0..count {
            if !state.queue.wake_one().is_woken() {
                state.permits += 1;
            }
        }
        Ok(())
    }

    /// Acquire a permit and return a guard that releases it on drop
    pub fn enter(&self, timeout: Option<Duration>) -> SyncResult<ScopedGuard<'_, Self>> {
        ScopedGuard::acquire(self, timeout)
    }

    pub fn available_permits(&self) -> usize {
        self.state.lock().permits
    }

    #[inline]
    pub fn max_permits(&self) -> usize {
        self.max_permits
    }

    pub fn waiter_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.instrument.stats().snapshot()
    }
}

impl Lockable for CountingGate {
    fn lock_for(&self, timeout: Option<Duration>) -> SyncResult<()> {
        self.acquire(timeout)
    }

    fn unlock(&self) -> SyncResult<()> {
        self.release()
    }

    fn resource_type(&self) -> &'static str {
        self.instrument.resource()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            CountingGate::new(3, 2),
            Err(SyncError::InvalidPermits { initial: 3, max: 2 })
        ));
        assert!(CountingGate::new(0, 0).is_err());
        assert!(CountingGate::new(0, 1).is_ok());
    }

    #[test]
    fn test_acquire_release_counts() {
        let gate = CountingGate::new(2, 2).unwrap();
        gate.acquire(None).unwrap();
        assert_eq!(gate.available_permits(), 1);
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());

        gate.release().unwrap();
        gate.release().unwrap();
        assert_eq!(gate.available_permits(), 2);
    }

    #[test]
    fn test_over_release_leaves_count_unchanged() {
        let gate = CountingGate::new(1, 2).unwrap();
        gate.release().unwrap();
        assert_eq!(
            gate.release(),
            Err(SyncError::OverRelease { max_permits: 2 })
        );
        assert_eq!(gate.available_permits(), 2);
        assert_eq!(gate.stats().rejected_releases, 1);
    }

    #[test]
    fn test_release_many_is_all_or_nothing() {
        let gate = CountingGate::new(0, 3).unwrap();
        assert!(gate.release_many(4).is_err());
        assert_eq!(gate.available_permits(), 0);

        gate.release_many(3).unwrap();
        assert_eq!(gate.available_permits(), 3);
        assert!(gate.release_many(usize::MAX).is_err());
    }

    #[test]
    fn test_release_hands_permit_to_waiter() {
        let gate = Arc::new(CountingGate::with_config(0, 1, SyncConfig::relaxed()).unwrap());

        let gate_clone = gate.clone();
        let waiter = thread::spawn(move || gate_clone.acquire(Some(Duration::from_secs(5))));

        while gate.waiter_count() < 1 {
            thread::sleep(Duration::from_millis(1));
        }
        gate.release().unwrap();

        assert!(waiter.join().unwrap().is_ok());
        assert_eq!(gate.available_permits(), 0);
        assert!(!gate.try_acquire());
    }

    #[test]
    fn test_release_many_wakes_one_per_permit() {
        let gate = Arc::new(CountingGate::with_config(0, 3, SyncConfig::relaxed()).unwrap());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let gate_clone = gate.clone();
                thread::spawn(move || gate_clone.acquire(Some(Duration::from_secs(5))))
            })
            .collect();

        while gate.waiter_count() < 2 {
            thread::sleep(Duration::from_millis(1));
        }
        gate.release_many(3).unwrap();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(gate.available_permits(), 1);
    }
}
