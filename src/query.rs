//! Builds the bidirectional transaction query.
//!
//! Only structure varies with the request: the number of counterpart
//! placeholders, whether the date bound is present, the ORDER BY choice and
//! the row cap. Every data value travels as a bound parameter, in the order
//! given by [`BuiltQuery::slots`]:
//!
//! focal, counterparts.., focal, counterparts.., [range start, range end]
//!
//! The focal id and the counterparts appear twice because the first
//! disjunct tests them against `SenderId`/`ReceiverId` and the second against
//! `ReceiverId`/`SenderId`.

use chrono::NaiveDateTime;
use rusqlite::types::{ToSql, ToSqlOutput};

use crate::error::{LedgerlinkError, Result};
use crate::model::{DateRange, LocalEntityId, SortMode};
use crate::settings::Dialect;

pub const COLUMNS: &str = "TxId, SenderId, ReceiverId, TxTime, NativeAmt, NormAmt";

/// The structural description of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryShape {
    pub counterparts: usize,
    pub cap: Option<u64>,
    pub date_range: bool,
    pub sort: Option<SortMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindSlot {
    Focal,
    Counterpart(usize),
    RangeStart,
    RangeEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Id(LocalEntityId),
    Time(NaiveDateTime),
}

impl ToSql for BindValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            BindValue::Id(id) => Ok(ToSqlOutput::from(id.value())),
            BindValue::Time(time) => time.to_sql(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub text: String,
    pub slots: Vec<BindSlot>,
    shape: QueryShape,
}

impl BuiltQuery {
    pub fn shape(&self) -> &QueryShape {
        &self.shape
    }
    pub fn placeholder_count(&self) -> usize {
        self.text.matches('?').count()
    }
    /// Fills the slots with values, in slot order. Missing date bounds are
    /// replaced by the earliest/latest sentinels.
    pub fn bind(
        &self,
        focal: LocalEntityId,
        counterparts: &[LocalEntityId],
        range: Option<&DateRange>,
    ) -> Result<Vec<BindValue>> {
        if counterparts.len() != self.shape.counterparts {
            return Err(LedgerlinkError::Invariant(format!(
                "query expects {} counterparts, {} supplied",
                self.shape.counterparts,
                counterparts.len()
            )));
        }
        let range = range.copied().unwrap_or_default();
        let values = self
            .slots
            .iter()
            .map(|slot| match slot {
                BindSlot::Focal => BindValue::Id(focal),
                BindSlot::Counterpart(i) => BindValue::Id(counterparts[*i]),
                BindSlot::RangeStart => BindValue::Time(range.start_or_min()),
                BindSlot::RangeEnd => BindValue::Time(range.end_or_max()),
            })
            .collect();
        Ok(values)
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    dialect: Dialect,
}

impl QueryBuilder {
    /// `table` is spliced into the text as is; it must come from validated
    /// settings, never from a request.
    pub fn new(table: &str, dialect: Dialect) -> Self {
        Self { table: table.to_string(), dialect }
    }
    pub fn build(&self, shape: &QueryShape) -> BuiltQuery {
        let mut slots = Vec::with_capacity(2 * shape.counterparts + 4);
        let mut sql = String::from("SELECT ");
        if let (Some(cap), Dialect::SqlServer) = (shape.cap, self.dialect) {
            sql.push_str(&format!("TOP {} ", cap));
        }
        sql.push_str(COLUMNS);
        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        sql.push_str(" WHERE ((SenderId = ?");
        slots.push(BindSlot::Focal);
        in_list(&mut sql, &mut slots, " AND ReceiverId", shape.counterparts);
        sql.push_str(") OR (ReceiverId = ?");
        slots.push(BindSlot::Focal);
        in_list(&mut sql, &mut slots, " AND SenderId", shape.counterparts);
        sql.push_str("))");

        if shape.date_range {
            match self.dialect {
                // '2014-03-01T12:00:00' sorts after '2014-03-01 23:59:59' as text
                Dialect::Sqlite => sql.push_str(" AND datetime(TxTime) BETWEEN datetime(?) AND datetime(?)"),
                Dialect::SqlServer => sql.push_str(" AND TxTime BETWEEN ? AND ?"),
            }
            slots.push(BindSlot::RangeStart);
            slots.push(BindSlot::RangeEnd);
        }
        match shape.sort {
            Some(SortMode::Date) => match self.dialect {
                Dialect::Sqlite => sql.push_str(" ORDER BY datetime(TxTime) ASC"),
                Dialect::SqlServer => sql.push_str(" ORDER BY TxTime ASC"),
            },
            Some(SortMode::Amount) => sql.push_str(" ORDER BY NormAmt DESC"),
            None => {}
        }
        if let (Some(cap), Dialect::Sqlite) = (shape.cap, self.dialect) {
            sql.push_str(&format!(" LIMIT {}", cap));
        }
        BuiltQuery { text: sql, slots, shape: *shape }
    }
}

fn in_list(sql: &mut String, slots: &mut Vec<BindSlot>, column: &str, count: usize) {
    if count == 0 {
        return;
    }
    sql.push_str(column);
    sql.push_str(" IN (");
    sql.push_str(&vec!["?"; count].join(", "));
    sql.push(')');
    slots.extend((0..count).map(BindSlot::Counterpart));
}
