/*!
 * Manual-Reset Latch
 *
 * Binary signal that, once set, releases every current and future waiter
 * until it is explicitly reset.
 */

use crate::config::SyncConfig;
use crate::errors::SyncResult;
use crate::guard::Lockable;
use crate::stats::{Instrument, StatsSnapshot};
use crate::wait::WaitQueue;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
struct LatchState {
    is_set: bool,
    // Always empty while `is_set`
    queue: WaitQueue,
}

/// One producer releasing any number of consumers at once
///
/// `reset` only affects later `wait` calls: a waiter released by `signal`
/// returns successfully even if the latch is reset before it runs again.
#[derive(Debug)]
pub struct ManualResetLatch {
    state: Mutex<LatchState>,
    instrument: Instrument,
}

impl ManualResetLatch {
    pub fn new(initial_set: bool) -> Self {
        Self::with_config(initial_set, SyncConfig::default())
    }

    pub fn with_config(initial_set: bool, config: SyncConfig) -> Self {
        Self {
            state: Mutex::new(LatchState {
                is_set: initial_set,
                queue: WaitQueue::new(),
            }),
            instrument: Instrument::new("manual_reset_latch", config),
        }
    }

    /// Set the latch and wake all waiters. Idempotent.
    pub fn signal(&self) {
        let mut state = self.state.lock();
        if state.is_set {
            return;
        }
        state.is_set = true;
        let woken = state.queue.wake_all();
        debug!(
            resource = self.instrument.resource(),
            woken = woken.count(),
            "latch set"
        );
    }

    /// Return to unset; later waiters block until the next `signal`
    pub fn reset(&self) {
        self.state.lock().is_set = false;
    }

    /// Return immediately if set, otherwise block until `signal`
    pub fn wait(&self, timeout: Option<Duration>) -> SyncResult<()> {
        let mut state = self.state.lock();
        if !state.is_set {
            self.instrument.block(&mut state, |s: &mut LatchState| &mut s.queue, timeout)?;
        }
        self.instrument.stats().record_acquire();
        Ok(())
    }

    pub fn is_set(&self) -> bool {
        self.state.lock().is_set
    }

    pub fn waiter_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.instrument.stats().snapshot()
    }
}

impl Lockable for ManualResetLatch {
    fn lock_for(&self, timeout: Option<Duration>) -> SyncResult<()> {
        self.wait(timeout)
    }

    /// Waiting on a latch consumes nothing, so there is nothing to release
    fn unlock(&self) -> SyncResult<()> {
        Ok(())
    }

    fn resource_type(&self) -> &'static str {
        self.instrument.resource()
    }
}
