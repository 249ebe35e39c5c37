/*!
 * Auto-Reset Signal
 *
 * Binary signal where each `signal` releases exactly one waiter and the
 * state re-arms to unset.
 *
 * - With a waiter queued, `signal` wakes the earliest one and the state
 *   stays unset; the wake and the reset are one step under the internal
 *   mutex, so no second waiter can observe `set`.
 * - With no waiter, `signal` banks a single release for the next `wait`.
 *   Repeated signals do not accumulate.
 *
 * A signal constructed as set is consumed by the first `wait`.
 *
 * Any thread may call `signal`. Whether exactly one worker proceeds per
 * work item depends on callers signalling once per item.
 */

use crate::config::SyncConfig;
use crate::errors::SyncResult;
use crate::guard::Lockable;
use crate::stats::{Instrument, StatsSnapshot};
use crate::wait::WaitQueue;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::trace;

#[derive(Debug)]
struct SignalState {
    is_set: bool,
    // Always empty while `is_set`
    queue: WaitQueue,
}

/// Single-release event
#[derive(Debug)]
pub struct AutoResetSignal {
    state: Mutex<SignalState>,
    instrument: Instrument,
}

impl AutoResetSignal {
    pub fn new(initial_set: bool) -> Self {
        Self::with_config(initial_set, SyncConfig::default())
    }

    pub fn with_config(initial_set: bool, config: SyncConfig) -> Self {
        Self {
            state: Mutex::new(SignalState {
                is_set: initial_set,
                queue: WaitQueue::new(),
            }),
            instrument: Instrument::new("auto_reset_signal", config),
        }
    }

    /// Release one waiter, or bank one release if nobody is waiting
    pub fn signal(&self) {
        let mut state = self.state.lock();
        if state.queue.wake_one().is_woken() {
            trace!(resource = self.instrument.resource(), "released one waiter");
        } else {
            state.is_set = true;
        }
    }

    /// Consume the banked release, or block until the next `signal`
    pub fn wait(&self, timeout: Option<Duration>) -> SyncResult<()> {
        let mut state = self.state.lock();
        if state.is_set {
            state.is_set = false;
        } else {
            self.instrument.block(&mut state, |s: &mut SignalState| &mut s.queue, timeout)?;
        }
        self.instrument.stats().record_acquire();
        Ok(())
    }

    /// Consume the banked release without blocking
    pub fn try_wait(&self) -> bool {
        let mut state = self.state.lock();
        if state.is_set {
            state.is_set = false;
            self.instrument.stats().record_acquire();
            true
        } else {
            false
        }
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

/// Used as a binary semaphore: waiting takes the signal, release gives it back
impl Lockable for AutoResetSignal {
    fn lock_for(&self, timeout: Option<Duration>) -> SyncResult<()> {
        self.wait(timeout)
    }

    fn unlock(&self) -> SyncResult<()> {
        self.signal();
        Ok(())
    }

    fn resource_type(&self) -> &'static str {
        self.instrument.resource()
    }
}
