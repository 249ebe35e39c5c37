/*!
 * RAII Guards
 *
 * Guaranteed release of any primitive around a critical section.
 *
 * ## Guard Types
 *
 * - **ScopedGuard**: holds one `Lockable` primitive, releases on drop
 * - **with_guard / try_with_guard**: closure form of the same contract
 *
 * ## Example
 *
 * ```rust
 * use ai_os_sync::{with_guard, MutualExclusionLock};
 *
 * let lock = MutualExclusionLock::new();
 * let total = with_guard(&lock, None, || 2 + 2).unwrap();
 * assert_eq!(total, 4);
 * assert!(!lock.is_locked());
 * ```
 */

mod scoped;
mod traits;

pub use scoped::{try_with_guard, with_guard, ScopedGuard};
pub use traits::{Guard, Lockable};

use std::thread::{self, ThreadId};
use std::time::Instant;

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: Instant,
    pub holder: ThreadId,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            creation_time: Instant::now(),
            holder: thread::current().id(),
        }
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
