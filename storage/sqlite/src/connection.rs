//! A rusqlite connection whose transactions and savepoints drive deferred actions

use std::path::PathBuf;

use oncommit_core::{ScopeError, Transactional};
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::SqliteError;

/// Configuration for SQLite connections
#[derive(Clone, Debug)]
pub enum SqliteConfig {
    /// File-based database
    File(PathBuf),
    /// In-memory database (for testing)
    Memory,
}

#[derive(Debug)]
enum Level {
    Transaction,
    Savepoint(String),
}

/// Owns a [`Connection`] and tracks the atomic blocks open on it.
///
/// The outermost block is a `BEGIN`/`COMMIT` transaction, nested blocks are
/// savepoints. Entering a block while the connection is inside a transaction
/// opened by someone else fails with [`SqliteError::ForeignTransaction`].
pub struct AtomicConnection {
    conn: Connection,
    levels: Vec<Level>,
    next_savepoint: u64,
    last_rolled_back: bool,
}

impl AtomicConnection {
    pub fn new(config: SqliteConfig) -> Result<Self, SqliteError> {
        let conn = match &config {
            SqliteConfig::File(path) => Connection::open(path)?,
            SqliteConfig::Memory => Connection::open_in_memory()?,
        };
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self::from_connection(conn))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SqliteError> { Self::new(SqliteConfig::File(path.into())) }

    pub fn open_in_memory() -> Result<Self, SqliteError> { Self::new(SqliteConfig::Memory) }

    pub fn from_connection(conn: Connection) -> Self { Self { conn, levels: Vec::new(), next_savepoint: 0, last_rolled_back: false } }

    pub fn connection(&self) -> &Connection { &self.conn }

    /// Number of atomic blocks currently open on this connection.
    pub fn depth(&self) -> usize { self.levels.len() }

    /// Run `body` in a transaction, or in a savepoint when one is already open.
    ///
    /// Actions queued through `oncommit_core` inside `body` run once the
    /// outermost block commits, and are discarded with any block that rolls back.
    pub fn atomic<R, E>(&mut self, body: impl FnOnce(&mut Self) -> Result<R, E>) -> Result<R, E>
    where E: From<SqliteError> + From<ScopeError> {
        oncommit_core::atomic(self, body)
    }

    fn rollback_level(&self, level: &Level) -> Result<(), rusqlite::Error> {
        match level {
            Level::Transaction => self.conn.execute_batch("ROLLBACK"),
            Level::Savepoint(name) => self.conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name};")),
        }
    }
}

impl Transactional for AtomicConnection {
    type Error = SqliteError;

    fn enter(&mut self) -> Result<(), SqliteError> {
        let level = if self.levels.is_empty() {
            if !self.conn.is_autocommit() {
                warn!("refusing atomic block inside a foreign transaction");
                return Err(SqliteError::ForeignTransaction);
            }
            self.conn.execute_batch("BEGIN")?;
            Level::Transaction
        } else {
            self.next_savepoint += 1;
            let name = format!("oncommit_sp_{}", self.next_savepoint);
            self.conn.execute_batch(&format!("SAVEPOINT {name}"))?;
            Level::Savepoint(name)
        };
        debug!(?level, depth = self.levels.len() + 1, "sqlite enter");
        self.levels.push(level);
        Ok(())
    }

    fn exit(&mut self, body_failed: bool) -> Result<(), SqliteError> {
        let level = self.levels.pop().ok_or(SqliteError::NotInScope)?;
        // cleared only once the commit or release went through
        self.last_rolled_back = true;

        if body_failed {
            debug!(?level, "sqlite rollback");
            self.rollback_level(&level)?;
            return Ok(());
        }

        let committed = match &level {
            Level::Transaction => self.conn.execute_batch("COMMIT"),
            Level::Savepoint(name) => self.conn.execute_batch(&format!("RELEASE {name}")),
        };
        match committed {
            Ok(()) => {
                debug!(?level, "sqlite commit");
                self.last_rolled_back = false;
                Ok(())
            }
            Err(err) => {
                warn!(?level, "sqlite commit failed, rolling back: {err}");
                // a failed COMMIT can leave the transaction open
                if matches!(level, Level::Savepoint(_)) || !self.conn.is_autocommit() {
                    if let Err(rollback_err) = self.rollback_level(&level) {
                        warn!(?level, "rollback after failed commit also failed: {rollback_err}");
                    }
                }
                Err(err.into())
            }
        }
    }

    fn needs_rollback(&self) -> bool { self.last_rolled_back }
}
