/*!
 * Wait/Notify Primitives
 *
 * The lowest layer every primitive is built from: a FIFO `WaitQueue` of
 * suspended callers guarded by the owning primitive's internal mutex.
 *
 * # Architecture
 *
 * - `queue`: enqueue-and-block, wake-one, wake-all
 * - `outcome`: wake/wait result types and deadline computation
 */

mod outcome;
mod queue;

pub use outcome::{deadline_after, WaitOutcome, WakeResult};
pub use queue::WaitQueue;
