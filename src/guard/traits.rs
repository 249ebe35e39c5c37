/*!
 * Guard Traits
 *
 * Core abstractions for RAII release of primitives
 */

use super::GuardMetadata;
use crate::errors::SyncResult;
use std::time::Duration;

/// A primitive with an acquire step and a matching release step
///
/// Implemented by every primitive so `ScopedGuard` can wrap any of them.
/// For primitives without a release step (a latch), `unlock` is a no-op.
pub trait Lockable: Send + Sync {
    /// Block until admitted, or until the timeout elapses
    fn lock_for(&self, timeout: Option<Duration>) -> SyncResult<()>;

    /// Undo one successful `lock_for`
    fn unlock(&self) -> SyncResult<()>;

    /// Resource type name for logging/debugging
    fn resource_type(&self) -> &'static str;
}

/// Core guard trait
///
/// All guards must implement this to provide:
/// - Resource type identification
/// - Metadata access
/// - Manual release capability
pub trait Guard {
    /// Resource type name for logging/debugging
    fn resource_type(&self) -> &'static str;

    /// Get guard metadata
    fn metadata(&self) -> &GuardMetadata;

    /// Check if guard still holds its primitive
    fn is_active(&self) -> bool;

    /// Manually release the primitive
    ///
    /// Returns `Err(AlreadyReleased)` if already released
    fn release(&mut self) -> SyncResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SyncError;
    use crate::gate::CountingGate;
    use crate::guard::ScopedGuard;

    fn release_twice<G: Guard>(guard: &mut G) -> (SyncResult<()>, SyncResult<()>) {
        (guard.release(), guard.release())
    }

    #[test]
    fn test_guard_release_through_trait() {
        let gate = CountingGate::new(1, 1).unwrap();
        let mut guard = ScopedGuard::acquire(&gate, None).unwrap();

        assert!(guard.is_active());
        assert_eq!(Guard::resource_type(&guard), "counting_gate");
        assert_eq!(guard.metadata().resource_type, "counting_gate");
        assert_eq!(gate.available_permits(), 0);

        let (first, second) = release_twice(&mut guard);
        assert_eq!(first, Ok(()));
        assert_eq!(second, Err(SyncError::AlreadyReleased));
        assert!(!guard.is_active());
        assert_eq!(gate.available_permits(), 1);

        drop(guard);
        assert_eq!(gate.available_permits(), 1);
    }

    #[test]
    fn test_lockable_is_object_safe() {
        let gate = CountingGate::new(1, 1).unwrap();
        let primitive: &dyn Lockable = &gate;

        let guard = ScopedGuard::acquire(primitive, None).unwrap();
        assert_eq!(gate.available_permits(), 0);
        drop(guard);
        assert_eq!(gate.available_permits(), 1);
    }
}
