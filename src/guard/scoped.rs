/*!
 * Scoped Guard
 *
 * Releases a primitive exactly once on every exit path of the protected
 * section: explicit release, normal scope exit, early `?` return, or panic
 * unwinding.
 */

use super::traits::{Guard, Lockable};
use super::GuardMetadata;
use crate::errors::{SyncError, SyncResult};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{error, trace};

/// RAII guard over any `Lockable` primitive
///
/// Not `Send`: an owned lock must be released by the thread that took it.
///
/// # Example
///
/// ```
/// use ai_os_sync::{CountingGate, ScopedGuard};
///
/// let gate = CountingGate::new(1, 1).unwrap();
/// {
///     let _guard = ScopedGuard::acquire(&gate, None).unwrap();
///     assert_eq!(gate.available_permits(), 0);
/// }
/// assert_eq!(gate.available_permits(), 1);
/// ```
#[must_use = "dropping the guard releases the primitive immediately"]
pub struct ScopedGuard<'a, L: Lockable + ?Sized> {
    primitive: &'a L,
    metadata: GuardMetadata,
    active: bool,
    _not_send: PhantomData<*const ()>,
}

impl<'a, L: Lockable + ?Sized> ScopedGuard<'a, L> {
    /// Acquire `primitive` and wrap it
    pub fn acquire(primitive: &'a L, timeout: Option<Duration>) -> SyncResult<Self> {
        primitive.lock_for(timeout)?;
        Ok(Self {
            primitive,
            metadata: GuardMetadata::new(primitive.resource_type()),
            active: true,
            _not_send: PhantomData,
        })
    }

    /// Release now and surface any release error
    pub fn unlock(mut self) -> SyncResult<()> {
        Guard::release(&mut self)
    }
}

impl<L: Lockable + ?Sized> Guard for ScopedGuard<'_, L> {
    fn resource_type(&self) -> &'static str {
        self.metadata.resource_type
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) -> SyncResult<()> {
        if !self.active {
            return Err(SyncError::AlreadyReleased);
        }
        self.active = false;
        trace!(
            resource = self.metadata.resource_type,
            held_micros = self.metadata.lifetime_micros(),
            "guard released"
        );
        self.primitive.unlock()
    }
}

impl<L: Lockable + ?Sized> Drop for ScopedGuard<'_, L> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(e) = Guard::release(self) {
            error!(
                resource = self.metadata.resource_type,
                error = %e,
                "guard failed to release on drop"
            );
        }
    }
}

impl<L: Lockable + ?Sized> std::fmt::Debug for ScopedGuard<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedGuard")
            .field("metadata", &self.metadata)
            .field("active", &self.active)
            .finish()
    }
}

/// Run `f` while holding `primitive`
///
/// The primitive is released before this returns, and also if `f` panics.
pub fn with_guard<L, F, R>(primitive: &L, timeout: Option<Duration>, f: F) -> SyncResult<R>
where
    L: Lockable + ?Sized,
    F: FnOnce() -> R,
{
    let guard = ScopedGuard::acquire(primitive, timeout)?;
    let result = f();
    guard.unlock()?;
    Ok(result)
}

/// Run a fallible `f` while holding `primitive`
///
/// Acquire and release errors convert into the caller's error type. The
/// primitive is released before `f`'s own error is returned.
pub fn try_with_guard<L, F, R, E>(primitive: &L, timeout: Option<Duration>, f: F) -> Result<R, E>
where
    L: Lockable + ?Sized,
    F: FnOnce() -> Result<R, E>,
    E: From<SyncError>,
{
    let guard = ScopedGuard::acquire(primitive, timeout)?;
    let result = f();
    let released = guard.unlock();
    let value = result?;
    released?;
    Ok(value)
}
