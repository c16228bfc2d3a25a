//! Pooled connections to the transaction store.
//!
//! The data access layer only needs [`ConnectionPool::acquire`]; the r2d2
//! pool over SQLite is the implementation used outside of tests. Connections
//! go back to the pool when the handle is dropped.

use std::ops::Deref;
use std::path::Path;
use std::time::Duration;

use r2d2::{CustomizeConnection, Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::error::Result;
use crate::settings::Settings;

pub trait ConnectionPool {
    type Connection: Deref<Target = Connection>;
    fn acquire(&self) -> Result<Self::Connection>;
}

impl ConnectionPool for Pool<SqliteConnectionManager> {
    type Connection = PooledConnection<SqliteConnectionManager>;
    fn acquire(&self) -> Result<Self::Connection> {
        Ok(self.get()?)
    }
}

#[derive(Debug)]
struct ReadOnly;

impl CustomizeConnection<Connection, rusqlite::Error> for ReadOnly {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.busy_timeout(Duration::from_secs(30))?;
        // nothing in this crate writes; let the store enforce it
        conn.execute_batch("PRAGMA query_only = ON;")?;
        Ok(())
    }
}

/// Opens a read-only pool over the database named in the settings.
pub fn open(settings: &Settings) -> Result<Pool<SqliteConnectionManager>> {
    open_file(Path::new(&settings.database), settings.pool_size)
}

pub fn open_file(path: &Path, size: u32) -> Result<Pool<SqliteConnectionManager>> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder()
        .max_size(size)
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ReadOnly))
        .build(manager)?;
    Ok(pool)
}
