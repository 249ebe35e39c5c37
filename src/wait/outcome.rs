/*!
 * Wait Outcomes
 *
 * Compact result types returned by the wait queue
 */

use std::time::{Duration, Instant};

/// Result of a wake operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// No waiters were waiting
    NoWaiters,
}

impl WakeResult {
    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// How a blocked caller left the wait queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Removed from the queue by `wake_one`/`wake_all`
    Woken,
    /// Deadline elapsed; the entry was removed before returning
    TimedOut,
}

impl WaitOutcome {
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WaitOutcome::Woken)
    }
}

/// Convert a relative timeout into an absolute deadline on the monotonic clock
///
/// `None`, or a timeout too large to represent, means wait forever.
#[inline]
pub fn deadline_after(timeout: Option<Duration>) -> Option<Instant> {
    timeout.and_then(|t| Instant::now().checked_add(t))
}
