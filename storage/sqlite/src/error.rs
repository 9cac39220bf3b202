//! Error types for the SQLite adapter

use oncommit_core::ScopeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("exit called with no open transaction or savepoint")]
    NotInScope,

    /// The connection is inside a transaction this adapter did not open, so it
    /// cannot tell when that transaction really commits.
    #[error("atomic block entered inside a transaction opened outside AtomicConnection")]
    ForeignTransaction,
}
