use tracing::{debug, warn};

use crate::{
    action::{Action, PendingActions},
    config::{DirtyMode, ScopeConfig},
    error::ScopeError,
};

/// The nested scope stack of one execution context.
///
/// Index 0 is the outermost transaction, the last entry is the innermost open
/// scope (transaction or savepoint). An empty stack means no scope is open.
/// A stack lives as long as its context and is reused across transactions.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<PendingActions>,
    config: ScopeConfig,
}

impl ScopeStack {
    pub fn new(config: ScopeConfig) -> Self { Self { scopes: Vec::new(), config } }

    pub fn config(&self) -> ScopeConfig { self.config }

    pub fn set_config(&mut self, config: ScopeConfig) { self.config = config; }

    pub fn depth(&self) -> usize { self.scopes.len() }

    pub fn in_scope(&self) -> bool { !self.scopes.is_empty() }

    /// Total number of queued actions across every open scope.
    pub fn pending_len(&self) -> usize { self.scopes.iter().map(PendingActions::len).sum() }

    pub fn is_dirty(&self) -> bool { self.is_dirty_in(self.config.dirty_mode) }

    pub fn is_dirty_in(&self, mode: DirtyMode) -> bool {
        match mode {
            DirtyMode::Strict => self.scopes.iter().any(|scope| !scope.is_empty()),
            DirtyMode::Permissive => self.in_scope(),
        }
    }

    pub fn begin(&mut self) {
        self.scopes.push(PendingActions::new());
        debug!(depth = self.scopes.len(), "scope begin");
    }

    pub fn append(&mut self, action: Action) -> Result<(), ScopeError> {
        let top = self.scopes.last_mut().ok_or(ScopeError::EmptyStack("append"))?;
        top.push(action);
        Ok(())
    }

    /// Close the innermost scope successfully.
    ///
    /// A savepoint's actions are promoted onto its parent. When the outermost
    /// scope closes, its actions run here, in queued order, before returning.
    pub fn commit(&mut self) -> Result<(), ScopeError> {
        match self.pop_commit()? {
            Some(batch) => batch.run(self.config.on_action_error),
            None => Ok(()),
        }
    }

    /// Pop and promote without running anything.
    ///
    /// Returns the batch to execute when the outermost scope was closed, so a
    /// caller holding the stack behind a borrow can release it first.
    pub fn pop_commit(&mut self) -> Result<Option<PendingActions>, ScopeError> {
        let popped = self.scopes.pop().ok_or(ScopeError::EmptyStack("commit"))?;
        let depth = self.scopes.len();
        match self.scopes.last_mut() {
            Some(parent) => {
                debug!(depth, promoted = popped.len(), "savepoint commit");
                parent.extend(popped);
                Ok(None)
            }
            None => {
                debug!(actions = popped.len(), "transaction commit");
                Ok(Some(popped))
            }
        }
    }

    pub fn rollback(&mut self) -> Result<(), ScopeError> {
        self.pop_rollback()?;
        Ok(())
    }

    /// Pop the innermost scope, handing back its discarded actions unexecuted.
    pub fn pop_rollback(&mut self) -> Result<PendingActions, ScopeError> {
        let popped = self.scopes.pop().ok_or(ScopeError::EmptyStack("rollback"))?;
        if popped.is_empty() {
            debug!(depth = self.scopes.len(), "scope rollback");
        } else {
            warn!(depth = self.scopes.len(), discarded = ?popped.names(), "scope rollback discarded queued actions");
        }
        Ok(popped)
    }
}
