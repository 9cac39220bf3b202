use std::cell::RefCell;

use crate::{
    action::{Action, PendingActions},
    config::{DirtyMode, ScopeConfig},
    error::ScopeError,
    install::installed_config,
    stack::ScopeStack,
};

// One independent stack per thread, created lazily on first use
thread_local! {
    static SCOPE_STACK: RefCell<ScopeStack> = RefCell::new(ScopeStack::new(installed_config().unwrap_or_default()));
}

#[cfg(feature = "tokio")]
tokio::task_local! {
    pub(crate) static TASK_SCOPE_STACK: RefCell<ScopeStack>;
}

/// Run `f` against the stack of the current execution context.
///
/// Inside [`crate::task::scope`] that is the task's own stack, anywhere else the
/// thread's. The borrow must never be held across user code.
#[cfg(feature = "tokio")]
fn with_stack<R>(f: impl FnOnce(&RefCell<ScopeStack>) -> R) -> R {
    if TASK_SCOPE_STACK.try_with(|_| ()).is_ok() {
        TASK_SCOPE_STACK.with(f)
    } else {
        SCOPE_STACK.with(f)
    }
}

#[cfg(not(feature = "tokio"))]
fn with_stack<R>(f: impl FnOnce(&RefCell<ScopeStack>) -> R) -> R { SCOPE_STACK.with(f) }

/// Static access to the scope stack of the current execution context
pub struct CurrentScope {}

impl CurrentScope {
    pub fn begin() { with_stack(|stack| stack.borrow_mut().begin()) }

    pub fn append(action: Action) -> Result<(), ScopeError> { with_stack(|stack| stack.borrow_mut().append(action)) }

    /// Commit the innermost scope. When it was the outermost one, its actions run
    /// on this context after the stack has been released, so an action that queues
    /// more work sees no open scope and runs that work immediately.
    pub fn commit() -> Result<(), ScopeError> {
        let batch = with_stack(|stack| {
            let mut stack = stack.borrow_mut();
            let policy = stack.config().on_action_error;
            stack.pop_commit().map(|batch| batch.map(|batch| (batch, policy)))
        })?;
        match batch {
            Some((batch, policy)) => batch.run(policy),
            None => Ok(()),
        }
    }

    pub fn rollback() -> Result<(), ScopeError> {
        let discarded: PendingActions = with_stack(|stack| stack.borrow_mut().pop_rollback())?;
        // captured state may have drop glue of its own
        drop(discarded);
        Ok(())
    }

    pub fn in_scope() -> bool { with_stack(|stack| stack.borrow().in_scope()) }

    pub fn depth() -> usize { with_stack(|stack| stack.borrow().depth()) }

    pub fn pending_len() -> usize { with_stack(|stack| stack.borrow().pending_len()) }

    pub fn is_dirty() -> bool { with_stack(|stack| stack.borrow().is_dirty()) }

    pub fn is_dirty_in(mode: DirtyMode) -> bool { with_stack(|stack| stack.borrow().is_dirty_in(mode)) }

    pub fn config() -> ScopeConfig { with_stack(|stack| stack.borrow().config()) }

    /// Override the configuration of this context's stack only.
    pub fn configure(config: ScopeConfig) { with_stack(|stack| stack.borrow_mut().set_config(config)) }
}
