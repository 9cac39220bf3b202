use std::sync::Arc;

use crate::{action::Action, context::CurrentScope, error::ScopeError};

/// Run `func` now, or defer it until the outermost scope of this context commits.
///
/// Fire-and-forget: nothing from the call is returned. Only the immediate path
/// can report an action failure here; a deferred failure surfaces from the commit.
pub fn queue_when_in_scope<F>(name: impl Into<String>, func: F) -> Result<(), ScopeError>
where F: FnOnce() -> anyhow::Result<()> + Send + 'static {
    let action = Action::new(name, func);
    if CurrentScope::in_scope() {
        CurrentScope::append(action)
    } else {
        action.run().map_err(ScopeError::from)
    }
}

/// Wrap `func` so that every call goes through [`queue_when_in_scope`].
///
/// Several arguments are passed as a tuple:
///
/// ```rust
/// use oncommit_core::{deferred, CurrentScope};
///
/// let invalidate = deferred("invalidate", |(table, id): (&'static str, u64)| {
///     println!("invalidate {table}:{id}");
///     Ok(())
/// });
///
/// CurrentScope::begin();
/// invalidate(("users", 7)).unwrap(); // queued
/// CurrentScope::commit().unwrap(); // runs now
/// ```
pub fn deferred<A, F>(name: &'static str, func: F) -> impl Fn(A) -> Result<(), ScopeError>
where
    A: Send + 'static,
    F: Fn(A) -> anyhow::Result<()> + Send + Sync + 'static,
{
    let func = Arc::new(func);
    move |args: A| {
        let func = func.clone();
        queue_when_in_scope(name, move || func(args))
    }
}
