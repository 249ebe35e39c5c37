/*!
 * Mutual Exclusion Lock
 *
 * Binary, non-reentrant lock that any thread may release.
 *
 * # Hand-off
 *
 * `release` with waiters queued keeps the lock marked locked and hands it
 * straight to the earliest waiter, so admission is strictly FIFO and an
 * unlocked lock always has an empty queue.
 *
 * # Re-entrancy
 *
 * A second `acquire` by the thread that already holds the lock deadlocks
 * that thread against itself. With the opt-in
 * `SyncConfig::detect_unowned_self_deadlock` (off by default, on in
 * `SyncConfig::strict()`) the lock remembers the last acquiring thread and
 * returns `SyncError::SelfDeadlock` instead. Because any thread may release,
 * this record is a best-effort hint, not an ownership check: a re-acquire
 * that another thread is about to unblock is also rejected.
 */

use crate::config::SyncConfig;
use crate::errors::{SyncError, SyncResult};
use crate::guard::{Lockable, ScopedGuard};
use crate::stats::{Instrument, StatsSnapshot};
use crate::wait::WaitQueue;
use parking_lot::Mutex;
use std::thread::{self, ThreadId};
use std::time::Duration;
use tracing::{trace, warn};

#[derive(Debug)]
struct LockState {
    locked: bool,
    last_holder: Option<ThreadId>,
    queue: WaitQueue,
}

/// Simple critical-section lock
#[derive(Debug)]
pub struct MutualExclusionLock {
    state: Mutex<LockState>,
    instrument: Instrument,
}

impl Default for MutualExclusionLock {
    fn default() -> Self {
        Self::new()
    }
}

impl MutualExclusionLock {
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            state: Mutex::new(LockState {
                locked: false,
                last_holder: None,
                queue: WaitQueue::new(),
            }),
            instrument: Instrument::new("mutex", config),
        }
    }

    /// Block until the lock is free, then take it
    ///
    /// `None` waits forever (or for `SyncConfig::default_timeout`).
    pub fn acquire(&self, timeout: Option<Duration>) -> SyncResult<()> {
        let caller = thread::current().id();
        let mut state = self.state.lock();

        if !state.locked {
            state.locked = true;
            state.last_holder = Some(caller);
            self.instrument.stats().record_acquire();
            trace!(resource = self.instrument.resource(), "acquired uncontended");
            return Ok(());
        }

        let detect = self.instrument.config().detect_unowned_self_deadlock;
        if detect && state.last_holder == Some(caller) {
            warn!(resource = self.instrument.resource(), "self-deadlock detected");
            return Err(SyncError::SelfDeadlock);
        }

        self.instrument.block(&mut state, |s: &mut LockState| &mut s.queue, timeout)?;

        debug_assert!(state.locked);
        state.last_holder = Some(caller);
        self.instrument.stats().record_acquire();
        Ok(())
    }

    /// Acquire with a bounded wait, reporting success as a boolean
    ///
    /// `Duration::ZERO` never blocks.
    pub fn try_acquire(&self, timeout: Duration) -> bool {
        self.acquire(Some(timeout)).is_ok()
    }

    /// Unlock and hand the lock to the earliest waiter, if any
    ///
    /// Releasing a lock that is not held is ignored.
    pub fn release(&self) {
        let mut state = self.state.lock();

        if !state.locked {
            warn!(resource = self.instrument.resource(), "release of unlocked lock ignored");
            return;
        }

        if state.queue.is_empty() {
            state.locked = false;
            state.last_holder = None;
        } else {
            state.last_holder = state.queue.peek();
            state.queue.wake_one();
        }
    }

    /// Acquire and return a guard that releases on drop
    pub fn lock(&self, timeout: Option<Duration>) -> SyncResult<ScopedGuard<'_, Self>> {
        ScopedGuard::acquire(self, timeout)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.instrument.stats().snapshot()
    }
}

impl Lockable for MutualExclusionLock {
    fn lock_for(&self, timeout: Option<Duration>) -> SyncResult<()> {
        self.acquire(timeout)
    }

    fn unlock(&self) -> SyncResult<()> {
        self.release();
        Ok(())
    }

    fn resource_type(&self) -> &'static str {
        self.instrument.resource()
    }
}
