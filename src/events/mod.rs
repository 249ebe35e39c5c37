/*!
 * Events
 *
 * Thread signaling with release-all (`ManualResetLatch`) and release-one
 * (`AutoResetSignal`) semantics.
 */

mod latch;
mod signal;

pub use latch::ManualResetLatch;
pub use signal::AutoResetSignal;
