/*!
 * Error Types
 * Centralized error handling for the synchronization primitives with thiserror and miette
 */

use miette::Diagnostic;
use std::thread::ThreadId;
use std::time::Duration;
use thiserror::Error;

/// Result type for primitive operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the primitives
///
/// Every error is returned synchronously from the operation that detected
/// it. A failed release never mutates state.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SyncError {
    #[error("Timed out after {waited:?} waiting to be admitted")]
    #[diagnostic(
        code(sync::timed_out),
        help("The deadline elapsed before the primitive admitted the caller. Retry or abort.")
    )]
    TimedOut { waited: Duration },

    #[error("Release by {caller:?} rejected: lock is held by {holder:?}")]
    #[diagnostic(
        code(sync::ownership_violation),
        help("Only the thread that acquired an owned lock may release it.")
    )]
    OwnershipViolation {
        holder: Option<ThreadId>,
        caller: ThreadId,
    },

    #[error("Release would exceed the maximum of {max_permits} permits")]
    #[diagnostic(
        code(sync::over_release),
        help("A permit was released more times than it was acquired. Look for a double release.")
    )]
    OverRelease { max_permits: usize },

    #[error("Lock re-acquired by the thread that already holds it")]
    #[diagnostic(
        code(sync::self_deadlock),
        help("The lock is not re-entrant. Release it before acquiring it again.")
    )]
    SelfDeadlock,

    #[error("Invalid permit configuration: initial {initial}, max {max}")]
    #[diagnostic(
        code(sync::invalid_permits),
        help("A gate needs max >= 1 and initial <= max.")
    )]
    InvalidPermits { initial: usize, max: usize },

    #[error("Guard already released")]
    #[diagnostic(code(sync::already_released))]
    AlreadyReleased,
}

impl SyncError {
    /// Timeouts are the only outcome a caller is expected to retry
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SyncError::TimedOut { .. })
    }

    /// Check whether this is a timeout
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, SyncError::TimedOut { .. })
    }
}
