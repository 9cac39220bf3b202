use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use oncommit_core::{install, queue_when_in_scope, ScopeConfig, ScopeError};
use oncommit_sqlite::{AtomicConnection, SqliteError};
use rusqlite::OptionalExtension;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// A fresh in-memory database with an `albums` table and the integration installed.
pub fn setup() -> Result<AtomicConnection, SqliteError> {
    install(ScopeConfig::default());
    let conn = AtomicConnection::open_in_memory()?;
    conn.connection().execute_batch(
        "CREATE TABLE albums (id INTEGER PRIMARY KEY, name TEXT NOT NULL, year TEXT NOT NULL);
         CREATE TABLE tracks (
             id INTEGER PRIMARY KEY,
             album_id INTEGER NOT NULL REFERENCES albums(id) DEFERRABLE INITIALLY DEFERRED,
             title TEXT NOT NULL
         );",
    )?;
    Ok(conn)
}

pub fn insert_album(conn: &AtomicConnection, name: &str, year: &str) -> Result<i64, SqliteError> {
    conn.connection().execute("INSERT INTO albums (name, year) VALUES (?1, ?2)", [name, year])?;
    Ok(conn.connection().last_insert_rowid())
}

pub fn album_names(conn: &AtomicConnection) -> Result<Vec<String>, SqliteError> {
    let mut stmt = conn.connection().prepare("SELECT name FROM albums ORDER BY id")?;
    let names = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

#[allow(unused)]
pub fn album_year(conn: &AtomicConnection, name: &str) -> Result<Option<String>, SqliteError> {
    Ok(conn.connection().query_row("SELECT year FROM albums WHERE name = ?1", [name], |row| row.get(0)).optional()?)
}

/// Collects the keys of deferred cache invalidations as they run.
#[derive(Clone, Default)]
pub struct Invalidations(Arc<Mutex<Vec<String>>>);

#[allow(unused)]
impl Invalidations {
    pub fn queue(&self, key: &str) -> Result<(), ScopeError> {
        let sink = self.0.clone();
        let key = key.to_string();
        queue_when_in_scope(format!("invalidate {key}"), move || {
            sink.lock().unwrap().push(key);
            Ok(())
        })
    }

    pub fn take(&self) -> Vec<String> { self.0.lock().unwrap().drain(..).collect() }
}
