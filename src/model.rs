//! Value types shared by every layer: identifiers, the generic link/property
//! data model, the caller's request and the result set handed back.

// used for timestamps on transactions and date ranges
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

// used to print out readable forms of identifiers
use std::fmt;
// used to parse local identifiers
use std::num::ParseIntError;
use std::str::FromStr;

// ------------- Identifiers -------------
/// Cross-namespace identifier used at the system boundary. Only the
/// namespace handler knows how to take it apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GlobalEntityId(String);

impl GlobalEntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for GlobalEntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl fmt::Display for GlobalEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A partition of the identifier space, one per underlying schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self(namespace.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for Namespace {
    fn from(namespace: &str) -> Self {
        Self(namespace.to_string())
    }
}
impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric identifier, meaningful only within one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LocalEntityId(i64);

impl LocalEntityId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
    pub fn value(&self) -> i64 {
        self.0
    }
}
impl FromStr for LocalEntityId {
    type Err = ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}
impl fmt::Display for LocalEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Account,
    Cluster,
}

impl EntityKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Account => "acct",
            EntityKind::Cluster => "clst",
        }
    }
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "acct" => Some(EntityKind::Account),
            "clst" => Some(EntityKind::Cluster),
            _ => None,
        }
    }
}

// ------------- Links and properties -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinkTag {
    Financial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyTag {
    Id,
    Date,
    Amount,
    Outflowing,
    Inflowing,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyValue {
    Text(String),
    Real(f64),
    Date(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: String,
    pub friendly_text: String,
    pub value: PropertyValue,
    pub tags: Vec<PropertyTag>,
}

impl Property {
    pub fn new(key: &str, value: PropertyValue, tag: PropertyTag) -> Self {
        Self {
            key: key.to_string(),
            friendly_text: key.to_string(),
            value,
            tags: vec![tag],
        }
    }
    pub fn has_tag(&self, tag: PropertyTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Direction of money relative to the focal entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Outflowing,
    Inflowing,
}

impl Direction {
    pub fn tag(&self) -> PropertyTag {
        match self {
            Direction::Outflowing => PropertyTag::Outflowing,
            Direction::Inflowing => PropertyTag::Inflowing,
        }
    }
}

/// An edge between two entities carrying typed properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub tag: LinkTag,
    pub source: GlobalEntityId,
    pub target: GlobalEntityId,
    pub properties: Vec<Property>,
}

/// One transaction row as a link. Built by [`crate::mapper::map_row`] only.
pub type TransactionEdge = Link;

impl Link {
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.key == key)
    }
    pub fn transaction_id(&self) -> Option<&str> {
        match self.property("id").map(|p| &p.value) {
            Some(PropertyValue::Text(id)) => Some(id),
            _ => None,
        }
    }
    pub fn time(&self) -> Option<NaiveDateTime> {
        match self.property("dt").map(|p| &p.value) {
            Some(PropertyValue::Date(time)) => Some(*time),
            _ => None,
        }
    }
    pub fn amount(&self) -> Option<f64> {
        match self.property("amount").map(|p| &p.value) {
            Some(PropertyValue::Real(amount)) => Some(*amount),
            _ => None,
        }
    }
    pub fn direction(&self) -> Option<Direction> {
        let amount = self.property("amount")?;
        if amount.has_tag(PropertyTag::Outflowing) {
            Some(Direction::Outflowing)
        } else if amount.has_tag(PropertyTag::Inflowing) {
            Some(Direction::Inflowing)
        } else {
            None
        }
    }
    pub fn annotation(&self) -> Option<&str> {
        match self.property("comment").map(|p| &p.value) {
            Some(PropertyValue::Text(comment)) => Some(comment),
            _ => None,
        }
    }
}

// ------------- Requests -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortMode {
    /// Oldest first.
    Date,
    /// Largest normalized amount first.
    Amount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start: Some(start), end: Some(end) }
    }
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
    // Missing bounds become sentinels so that BETWEEN always gets two values.
    pub fn start_or_min(&self) -> NaiveDateTime {
        self.start.unwrap_or_else(earliest)
    }
    pub fn end_or_max(&self) -> NaiveDateTime {
        self.end.unwrap_or_else(latest)
    }
}

fn earliest() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

fn latest() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Everything a caller can ask of [`crate::access::TransactionDataAccess::get_transactions`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest {
    pub entities: Vec<GlobalEntityId>,
    pub tag: LinkTag,
    pub date: Option<DateRange>,
    pub sort: Option<SortMode>,
    pub counterpart_filter: Option<Vec<GlobalEntityId>>,
    pub start: i64,
    /// Zero or negative means no cap.
    pub max_results: i64,
}

impl TransactionRequest {
    pub fn new(entities: Vec<GlobalEntityId>) -> Self {
        Self {
            entities,
            tag: LinkTag::Financial,
            date: None,
            sort: None,
            counterpart_filter: None,
            start: 0,
            max_results: 0,
        }
    }
    pub fn with_date(mut self, date: DateRange) -> Self {
        self.date = Some(date);
        self
    }
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = Some(sort);
        self
    }
    pub fn with_counterparts(mut self, counterparts: Vec<GlobalEntityId>) -> Self {
        self.counterpart_filter = Some(counterparts);
        self
    }
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }
    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }
    pub fn cap(&self) -> Option<u64> {
        if self.max_results > 0 { Some(self.max_results as u64) } else { None }
    }
}

// ------------- Results -------------
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionResultSet {
    pub total: u64,
    pub edges: Vec<TransactionEdge>,
}

impl TransactionResultSet {
    pub fn new(edges: Vec<TransactionEdge>) -> Self {
        Self { total: edges.len() as u64, edges }
    }
    pub fn empty() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.edges.len()
    }
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
    /// Sums the totals and appends the other edges after ours, as they are.
    pub fn absorb(&mut self, other: TransactionResultSet) {
        self.total += other.total;
        self.edges.extend(other.edges);
    }
}
