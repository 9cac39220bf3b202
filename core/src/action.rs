use std::fmt;

use tracing::warn;

use crate::{
    config::FailurePolicy,
    error::{ActionFailure, ScopeError},
};

type ActionFn = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// A side-effecting call captured together with its arguments, run at most once.
pub struct Action {
    name: String,
    func: ActionFn,
}

impl Action {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where F: FnOnce() -> anyhow::Result<()> + Send + 'static {
        Self { name: name.into(), func: Box::new(func) }
    }

    /// Wrap a closure that cannot fail.
    pub fn infallible<F>(name: impl Into<String>, func: F) -> Self
    where F: FnOnce() + Send + 'static {
        Self::new(name, move || {
            func();
            Ok(())
        })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn run(self) -> Result<(), ActionFailure> {
        let Action { name, func } = self;
        func().map_err(|source| ActionFailure { name, source })
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_tuple("Action").field(&self.name).finish() }
}

/// The ordered queue of one open scope.
#[derive(Debug, Default)]
pub struct PendingActions(Vec<Action>);

impl PendingActions {
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn push(&mut self, action: Action) { self.0.push(action); }

    /// Append a committed child's actions after our own, keeping both orders intact.
    pub fn extend(&mut self, other: PendingActions) { self.0.extend(other.0); }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn names(&self) -> Vec<&str> { self.0.iter().map(Action::name).collect() }

    /// Execute every action in queued order.
    ///
    /// Under [`FailurePolicy::Abort`] the first failure stops the batch and the
    /// remaining actions are dropped unexecuted. Under [`FailurePolicy::RunAll`]
    /// every action is attempted and the failures are reported together.
    pub fn run(self, policy: FailurePolicy) -> Result<(), ScopeError> {
        let total = self.0.len();
        let mut failures = Vec::new();
        let mut actions = self.0.into_iter();
        while let Some(action) = actions.next() {
            if let Err(failure) = action.run() {
                match policy {
                    FailurePolicy::Abort => {
                        let skipped = actions.len();
                        warn!(action = %failure.name, skipped, total, "deferred action failed, aborting batch: {}", failure.source);
                        return Err(ScopeError::ActionFailed(failure));
                    }
                    FailurePolicy::RunAll => {
                        warn!(action = %failure.name, total, "deferred action failed: {}", failure.source);
                        failures.push(failure);
                    }
                }
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(ScopeError::ActionFailed(failures.remove(0))),
            _ => Err(ScopeError::ActionsFailed(failures)),
        }
    }
}
