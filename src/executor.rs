// used for reading rows
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Row, Statement};
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::pool::ConnectionPool;
use crate::query::{BindValue, BuiltQuery};

// ------------- Raw rows -------------
/// One row as the store returns it, before any identifier is globalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub transaction_id: String,
    pub sender: String,
    pub receiver: String,
    pub time: NaiveDateTime,
    pub native_amount: f64,
    pub normalized_amount: f64,
}

impl RawRow {
    /// Column order follows [`crate::query::COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            transaction_id: text_column(row, 0)?,
            sender: text_column(row, 1)?,
            receiver: text_column(row, 2)?,
            time: row.get(3)?,
            native_amount: row.get(4)?,
            normalized_amount: row.get(5)?,
        })
    }
}

// Ids may be stored as integers or as text; either way they are compared and
// formatted as text.
fn text_column(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    let statement: &Statement<'_> = row.as_ref();
    match row.get_ref(index)? {
        ValueRef::Integer(i) => Ok(i.to_string()),
        ValueRef::Text(t) => Ok(String::from_utf8_lossy(t).into_owned()),
        other => Err(rusqlite::Error::InvalidColumnType(
            index,
            statement.column_name(index).map(String::from).unwrap_or_default(),
            other.data_type(),
        )),
    }
}

// ------------- Execution -------------
/// Runs the query on a connection of its own and hands every row to `map`
/// while the cursor is open. The connection, statement and cursor are
/// released when this returns, whether it succeeded or not.
pub fn execute<P, T, F>(pool: &P, query: &BuiltQuery, binds: &[BindValue], mut map: F) -> Result<Vec<T>>
where
    P: ConnectionPool + ?Sized,
    F: FnMut(RawRow) -> T,
{
    let connection = pool.acquire()?;
    let mut statement = connection.prepare(&query.text)?;
    let mut rows = statement.query(params_from_iter(binds.iter()))?;
    let mut mapped = Vec::new();
    while let Some(row) = rows.next()? {
        mapped.push(map(RawRow::from_row(row)?));
    }
    Ok(mapped)
}
