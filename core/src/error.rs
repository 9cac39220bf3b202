use thiserror::Error;

/// A deferred action that returned an error when it was finally executed.
#[derive(Error, Debug)]
#[error("deferred action `{name}` failed: {source}")]
pub struct ActionFailure {
    pub name: String,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Error, Debug)]
pub enum ScopeError {
    /// `append`, `commit` or `rollback` was called with no open scope.
    /// This is a begin/commit pairing bug in the caller and is never retried.
    #[error("{0} called with no open scope")]
    EmptyStack(&'static str),
    /// An action failed after the outermost scope committed.
    /// The transaction itself already succeeded; this is not a rollback.
    #[error(transparent)]
    ActionFailed(#[from] ActionFailure),
    /// Several actions failed under `FailurePolicy::RunAll`.
    #[error("{} deferred actions failed", .0.len())]
    ActionsFailed(Vec<ActionFailure>),
}

impl ScopeError {
    pub fn is_protocol_violation(&self) -> bool { matches!(self, ScopeError::EmptyStack(_)) }

    /// All action failures carried by this error, in execution order.
    pub fn failures(&self) -> &[ActionFailure] {
        match self {
            ScopeError::EmptyStack(_) => &[],
            ScopeError::ActionFailed(failure) => std::slice::from_ref(failure),
            ScopeError::ActionsFailed(failures) => failures,
        }
    }
}

/// Failure of a guarded scope: either the wrapped resource or the scope stack.
#[derive(Error, Debug)]
pub enum GuardError<E> {
    #[error("transactional resource error: {0}")]
    Resource(E),
    #[error(transparent)]
    Scope(#[from] ScopeError),
}
