/*!
 * Owned Lock
 *
 * Binary lock that records the acquiring thread and rejects release from
 * any other thread with `SyncError::OwnershipViolation`. A rejected release
 * leaves the lock untouched.
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
struct OwnedState {
    // `Some` exactly when locked
    owner: Option<ThreadId>,
    queue: WaitQueue,
}

/// Ownership-checked, non-reentrant lock
#[derive(Debug)]
pub struct OwnedLock {
    state: Mutex<OwnedState>,
    instrument: Instrument,
}

impl Default for OwnedLock {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnedLock {
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            state: Mutex::new(OwnedState {
                owner: None,
                queue: WaitQueue::new(),
            }),
            instrument: Instrument::new("owned_lock", config),
        }
    }

    /// Block until free, then record the calling thread as owner
    pub fn acquire(&self, timeout: Option<Duration>) -> SyncResult<()> {
        let caller = thread::current().id();
        let mut state = self.state.lock();

        match state.owner {
            None => {
                state.owner = Some(caller);
                self.instrument.stats().record_acquire();
                trace!(resource = self.instrument.resource(), "acquired uncontended");
                return Ok(());
            }
            Some(owner) if owner == caller && self.instrument.config().detect_self_deadlock => {
                warn!(resource = self.instrument.resource(), "self-deadlock detected");
                return Err(SyncError::SelfDeadlock);
            }
            Some(_) => {}
        }

        self.instrument.block(&mut state, |s: &mut OwnedState| &mut s.queue, timeout)?;

        // The releaser transferred ownership before waking us
        debug_assert_eq!(state.owner, Some(caller));
        self.instrument.stats().record_acquire();
        Ok(())
    }

    /// Acquire with a bounded wait, reporting success as a boolean
    pub fn try_acquire(&self, timeout: Duration) -> bool {
        self.acquire(Some(timeout)).is_ok()
    }

    /// Release the lock; only the owning thread may do so
    pub fn release(&self) -> SyncResult<()> {
        let caller = thread::current().id();
        let mut state = self.state.lock();

        if state.owner != Some(caller) {
            self.instrument.stats().record_rejected_release();
            warn!(
                resource = self.instrument.resource(),
                holder = ?state.owner,
                caller = ?caller,
                "release by non-owner rejected"
            );
            return Err(SyncError::OwnershipViolation {
                holder: state.owner,
                caller,
            });
        }

        state.owner = state.queue.peek();
        state.queue.wake_one();
        Ok(())
    }

    /// Acquire and return a guard that releases on drop
    pub fn lock(&self, timeout: Option<Duration>) -> SyncResult<ScopedGuard<'_, Self>> {
        ScopedGuard::acquire(self, timeout)
    }

    /// Thread currently holding the lock
    pub fn holder(&self) -> Option<ThreadId> {
        self.state.lock().owner
    }

    pub fn is_held_by_current(&self) -> bool {
        self.holder() == Some(thread::current().id())
    }

    pub fn is_locked(&self) -> bool {
        self.holder().is_some()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.instrument.stats().snapshot()
    }
}

impl Lockable for OwnedLock {
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
