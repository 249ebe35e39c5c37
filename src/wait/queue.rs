/*!
 * Wait Queue
 *
 * FIFO queue of blocked execution contexts belonging to one primitive.
 *
 * # Design: Queue Lives Inside the Primitive's State
 *
 * The queue is not synchronized on its own. It is a field of the state a
 * primitive protects with its internal `parking_lot::Mutex`, so enqueue,
 * wake, and timeout removal are all serialized by that one lock. Each entry
 * owns a private condvar and a `woken` flag:
 *
 * - `wake_one`/`wake_all` pop entries, set `woken`, then notify.
 * - A blocked caller only returns `Woken` after seeing its own flag set,
 *   so spurious condvar returns are absorbed by the loop.
 * - On deadline expiry the caller re-checks `woken` while holding the
 *   mutex; if a wake already landed it wins, otherwise the entry is removed
 *   and can never be woken later.
 *
 * Wakes are hand-offs: the waker mutates the primitive's state on behalf of
 * the woken caller before releasing the mutex, which is what makes FIFO
 * admission possible without barging.
 */

use super::outcome::{WaitOutcome, WakeResult};
use parking_lot::{Condvar, MutexGuard};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Instant;

/// One blocked execution context
#[derive(Debug)]
struct Waiter {
    id: u64,
    thread: ThreadId,
    condvar: Condvar,
    // Only written while the owning primitive's mutex is held
    woken: AtomicBool,
}

impl Waiter {
    #[inline]
    fn is_woken(&self) -> bool {
        self.woken.load(Ordering::Relaxed)
    }

    #[inline]
    fn wake(&self) {
        self.woken.store(true, Ordering::Relaxed);
        self.condvar.notify_one();
    }
}

/// Ordered collection of blocked callers
#[derive(Debug, Default)]
pub struct WaitQueue {
    waiters: VecDeque<Arc<Waiter>>,
    next_id: u64,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self {
            waiters: VecDeque::with_capacity(4),
            next_id: 0,
        }
    }

    /// Number of currently blocked callers
    #[inline]
    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Identity of the caller `wake_one` would wake next
    #[inline]
    pub fn peek(&self) -> Option<ThreadId> {
        self.waiters.front().map(|w| w.thread)
    }

    /// Remove and wake the earliest-enqueued entry
    pub fn wake_one(&mut self) -> WakeResult {
        match self.waiters.pop_front() {
            Some(waiter) => {
                waiter.wake();
                WakeResult::Woken(1)
            }
            None => WakeResult::NoWaiters,
        }
    }

    /// Remove and wake every entry
    pub fn wake_all(&mut self) -> WakeResult {
        if self.waiters.is_empty() {
            return WakeResult::NoWaiters;
        }
        let count = self.waiters.len();
        for waiter in self.waiters.drain(..) {
            waiter.wake();
        }
        WakeResult::Woken(count)
    }

    fn push(&mut self) -> Arc<Waiter> {
        let waiter = Arc::new(Waiter {
            id: self.next_id,
            thread: thread::current().id(),
            condvar: Condvar::new(),
            woken: AtomicBool::new(false),
        });
        self.next_id = self.next_id.wrapping_add(1);
        self.waiters.push_back(Arc::clone(&waiter));
        waiter
    }

    fn remove(&mut self, id: u64) {
        if let Some(pos) = self.waiters.iter().position(|w| w.id == id) {
            self.waiters.remove(pos);
        }
    }

    /// Enqueue the calling context and suspend it
    ///
    /// `guard` is the primitive's internal mutex guard; it is released while
    /// suspended and re-held on return. `queue` projects the wait queue out
    /// of the guarded state. Returns `TimedOut` without enqueueing if the
    /// deadline has already passed.
    pub fn enqueue_and_block<T, F>(
        guard: &mut MutexGuard<'_, T>,
        queue: F,
        deadline: Option<Instant>,
    ) -> WaitOutcome
    where
        F: Fn(&mut T) -> &mut WaitQueue,
    {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return WaitOutcome::TimedOut;
            }
        }

        let waiter = queue(&mut **guard).push();

        loop {
            if waiter.is_woken() {
                return WaitOutcome::Woken;
            }

            match deadline {
                None => waiter.condvar.wait(guard),
                Some(deadline) => {
                    if waiter.condvar.wait_until(guard, deadline).timed_out() {
                        if waiter.is_woken() {
                            return WaitOutcome::Woken;
                        }
                        queue(&mut **guard).remove(waiter.id);
                        return WaitOutcome::TimedOut;
                    }
                }
            }
        }
    }
}
