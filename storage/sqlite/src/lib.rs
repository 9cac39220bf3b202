//! SQLite adapter for oncommit
//!
//! [`AtomicConnection`] wraps a `rusqlite::Connection` so that its transactions
//! and savepoints drive the deferred-action scopes of `oncommit_core`:
//!
//! - the outermost atomic block is a `BEGIN` ... `COMMIT` transaction
//! - nested blocks are `SAVEPOINT`s, released or rolled back on exit
//! - the commit/rollback decision for queued actions is taken from the state
//!   the connection is left in, so a failing `COMMIT` discards them
//!
//! # Example
//!
//! ```rust
//! use oncommit_core::{install, queue_when_in_scope, ScopeConfig};
//! use oncommit_sqlite::{AtomicConnection, SqliteError};
//!
//! install(ScopeConfig::default());
//! let mut conn = AtomicConnection::open_in_memory()?;
//! conn.connection().execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
//!
//! conn.atomic(|conn| -> Result<(), SqliteError> {
//!     conn.connection().execute("INSERT INTO users (name) VALUES (?1)", ["ada"])?;
//!     queue_when_in_scope("invalidate users", || Ok(()))?;
//!     Ok(())
//! })?;
//! # Ok::<(), SqliteError>(())
//! ```

mod connection;
mod error;

pub use connection::{AtomicConnection, SqliteConfig};
pub use error::SqliteError;
