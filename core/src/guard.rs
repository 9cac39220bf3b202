use tracing::{error, warn};

use crate::{context::CurrentScope, error::GuardError, error::ScopeError, install::is_installed};

/// An external transactional scope (transaction or savepoint) that can be wrapped
/// by a [`ScopeGuard`].
///
/// The post-exit queries describe the state the resource is left in after
/// [`Transactional::exit`], and are only consulted after it returned.
pub trait Transactional {
    type Error: std::fmt::Display;

    /// Open a transaction, or a savepoint when one is already open.
    fn enter(&mut self) -> Result<(), Self::Error>;

    /// Close the innermost scope. `body_failed` asks for a rollback.
    fn exit(&mut self, body_failed: bool) -> Result<(), Self::Error>;

    /// Whether the scope that just exited was rolled back rather than committed.
    fn needs_rollback(&self) -> bool;

    /// Whether the underlying connection was closed while the scope was open.
    fn closed_in_transaction(&self) -> bool { false }
}

/// Drives the current context's [`ScopeStack`](crate::ScopeStack) alongside one
/// scope of a [`Transactional`] resource.
///
/// Dropping a guard without calling [`ScopeGuard::exit`] (early return, panic)
/// exits it as failed.
pub struct ScopeGuard<'a, T: Transactional> {
    resource: &'a mut T,
    tracked: bool,
    exited: bool,
}

impl<'a, T: Transactional> ScopeGuard<'a, T> {
    pub fn enter(resource: &'a mut T) -> Result<Self, GuardError<T::Error>> {
        let tracked = is_installed();
        if tracked {
            CurrentScope::begin();
        }
        if let Err(e) = resource.enter() {
            if tracked {
                CurrentScope::rollback()?;
            }
            return Err(GuardError::Resource(e));
        }
        Ok(Self { resource, tracked, exited: false })
    }

    pub fn resource(&mut self) -> &mut T { &mut *self.resource }

    /// Exit the resource's scope first, then commit or roll back the deferred
    /// actions according to the state it was left in.
    pub fn exit(mut self, body_failed: bool) -> Result<(), GuardError<T::Error>> {
        self.exited = true;
        self.finish(body_failed)
    }

    fn finish(&mut self, body_failed: bool) -> Result<(), GuardError<T::Error>> {
        let exited = self.resource.exit(body_failed);
        let clean = exited.is_ok() && !body_failed && !self.resource.needs_rollback() && !self.resource.closed_in_transaction();
        if self.tracked {
            let scoped = if clean { CurrentScope::commit() } else { CurrentScope::rollback() };
            if let Err(scope_err) = scoped {
                if let Err(resource_err) = &exited {
                    warn!("resource exit failed before the scope error: {resource_err}");
                }
                return Err(scope_err.into());
            }
        }
        exited.map_err(GuardError::Resource)
    }
}

impl<T: Transactional> Drop for ScopeGuard<'_, T> {
    fn drop(&mut self) {
        if !self.exited {
            self.exited = true;
            match self.finish(true) {
                Ok(()) => {}
                Err(GuardError::Scope(e)) => error!("scope guard dropped without exit: {e}"),
                Err(GuardError::Resource(e)) => warn!("scope guard dropped without exit, resource rollback failed: {e}"),
            }
        }
    }
}

/// Run `body` inside one guarded scope of `resource`.
///
/// An error from `body` rolls the scope back and is returned unchanged. Failures
/// of deferred actions at the outermost commit come back as [`ScopeError`] after
/// the resource has already committed.
pub fn atomic<T, R, E, F>(resource: &mut T, body: F) -> Result<R, E>
where
    T: Transactional,
    E: From<T::Error> + From<ScopeError>,
    F: FnOnce(&mut T) -> Result<R, E>,
{
    let mut guard = ScopeGuard::enter(resource).map_err(lift::<E, T::Error>)?;
    match body(guard.resource()) {
        Ok(value) => {
            guard.exit(false).map_err(lift::<E, T::Error>)?;
            Ok(value)
        }
        Err(body_err) => {
            if let Err(e) = guard.exit(true) {
                match e {
                    GuardError::Scope(scope_err) => return Err(scope_err.into()),
                    GuardError::Resource(e) => warn!("rollback after failed body also failed: {e}"),
                }
            }
            Err(body_err)
        }
    }
}

fn lift<E, X>(err: GuardError<X>) -> E
where E: From<X> + From<ScopeError> {
    match err {
        GuardError::Resource(e) => e.into(),
        GuardError::Scope(e) => e.into(),
    }
}
