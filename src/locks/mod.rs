/*!
 * Locks
 *
 * Binary locks built on the FIFO wait queue:
 * - `MutualExclusionLock`: any thread may release
 * - `OwnedLock`: only the acquiring thread may release
 */

mod mutex;
mod owned;

pub use mutex::MutualExclusionLock;
pub use owned::OwnedLock;
