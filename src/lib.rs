/*!
 * AI-OS Sync Library
 *
 * Blocking coordination primitives for preemptive threads, built on one
 * FIFO wait queue:
 * - `MutualExclusionLock` / `OwnedLock`: binary locks
 * - `ManualResetLatch` / `AutoResetSignal`: release-all and release-one events
 * - `CountingGate`: bounded admission
 * - `ScopedGuard`: release on every exit path
 *
 * Primitives are plain values; share them with `Arc` or by reference.
 */

pub mod config;
pub mod errors;
pub mod events;
pub mod gate;
pub mod guard;
pub mod locks;
pub mod stats;
pub mod wait;

// Re-exports
pub use config::SyncConfig;
pub use errors::{SyncError, SyncResult};
pub use events::{AutoResetSignal, ManualResetLatch};
pub use gate::CountingGate;
pub use guard::{try_with_guard, with_guard, Guard, GuardMetadata, Lockable, ScopedGuard};
pub use locks::{MutualExclusionLock, OwnedLock};
pub use stats::{StatsSnapshot, SyncStats};
pub use wait::{WaitOutcome, WaitQueue, WakeResult};
