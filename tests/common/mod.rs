#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};

use ledgerlink::access::TransactionDataAccess;
use ledgerlink::error::{LedgerlinkError, Result};
use ledgerlink::model::GlobalEntityId;
use ledgerlink::namespace::DelimitedNamespaceHandler;
use ledgerlink::pool::{self, ConnectionPool};
use ledgerlink::settings::Settings;

pub type Access = TransactionDataAccess<Pool<SqliteConnectionManager>, DelimitedNamespaceHandler>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub fn acct(id: &str) -> GlobalEntityId {
    GlobalEntityId::new(format!("acct:ns1:{}", id))
}

pub fn handler() -> DelimitedNamespaceHandler {
    DelimitedNamespaceHandler::new(["ns1", "ns2"])
}

/// A throwaway SQLite file holding a transactions table, removed on drop.
pub struct Fixture {
    pub path: PathBuf,
    pub settings: Settings,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        Self::create(name, "integer")
    }
    /// Same table, but the id columns have text affinity, so quoted ids stay text.
    pub fn with_text_ids(name: &str) -> Self {
        Self::create(name, "text")
    }
    fn create(name: &str, id_type: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "ledgerlink_{}_{}.db",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let conn = Connection::open(&path).expect("open fixture db");
        conn.execute_batch(&format!(
            "
            create table UserTransactions (
                TxId text not null primary key,
                SenderId {id_type} not null,
                ReceiverId {id_type} not null,
                TxTime text not null,
                NativeAmt real not null,
                NormAmt real not null
            );
            "
        ))
        .expect("create table");
        let settings = Settings {
            database: path.to_string_lossy().to_string(),
            pool_size: 2,
            ..Settings::default()
        };
        Self { path, settings }
    }
    /// Five transactions among accounts 1 to 4:
    /// t1 1->2, t2 2->1, t3 1->3, t4 3->4, t5 4->1, one month apart in 2014.
    pub fn seeded(name: &str) -> Self {
        let fixture = Self::new(name);
        fixture.insert("t1", 1, 2, at(2014, 1, 1), 0.5, 400.0);
        fixture.insert("t2", 2, 1, at(2014, 2, 1), 0.25, 150.0);
        fixture.insert("t3", 1, 3, at(2014, 3, 1), 1.0, 900.0);
        fixture.insert("t4", 3, 4, at(2014, 4, 1), 2.0, 1500.0);
        fixture.insert("t5", 4, 1, at(2014, 5, 1), 0.125, 50.0);
        fixture
    }
    pub fn insert(&self, tx: &str, sender: i64, receiver: i64, time: NaiveDateTime, native: f64, normalized: f64) {
        let conn = Connection::open(&self.path).expect("open fixture db");
        conn.execute(
            "insert into UserTransactions (TxId, SenderId, ReceiverId, TxTime, NativeAmt, NormAmt) values (?, ?, ?, ?, ?, ?)",
            params![tx, sender, receiver, time, native, normalized],
        )
        .expect("insert transaction");
    }
    /// Inserts a row with `TxTime` written exactly as given.
    pub fn insert_raw_time(&self, tx: &str, sender: i64, receiver: i64, time: &str, native: f64, normalized: f64) {
        let conn = Connection::open(&self.path).expect("open fixture db");
        conn.execute(
            "insert into UserTransactions (TxId, SenderId, ReceiverId, TxTime, NativeAmt, NormAmt) values (?, ?, ?, ?, ?, ?)",
            params![tx, sender, receiver, time, native, normalized],
        )
        .expect("insert transaction");
    }
    pub fn pool(&self) -> Pool<SqliteConnectionManager> {
        pool::open(&self.settings).expect("pool")
    }
    pub fn access(&self) -> Access {
        init_tracing();
        TransactionDataAccess::new(self.pool(), handler(), &self.settings).expect("access")
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// A pool that never hands out a connection.
pub struct FailingPool;

impl ConnectionPool for FailingPool {
    type Connection = Box<Connection>;
    fn acquire(&self) -> Result<Self::Connection> {
        Err(LedgerlinkError::DataAccess("pool exhausted".to_string()))
    }
}

/// Counts acquisitions on top of a real pool.
pub struct CountingPool {
    pub inner: Pool<SqliteConnectionManager>,
    pub acquired: std::cell::Cell<usize>,
}

impl ConnectionPool for CountingPool {
    type Connection = r2d2::PooledConnection<SqliteConnectionManager>;
    fn acquire(&self) -> Result<Self::Connection> {
        self.acquired.set(self.acquired.get() + 1);
        self.inner.acquire()
    }
}

pub fn ids(results: &ledgerlink::model::TransactionResultSet) -> Vec<&str> {
    results
        .edges
        .iter()
        .map(|edge| edge.transaction_id().expect("id property"))
        .collect()
}
