//! Ledgerlink – financial transactions between entities, read from a relational
//! table and returned as a link graph.
//!
//! Callers speak in *global* entity ids, strings that carry a namespace and a
//! local part (for instance `acct:ns1:42`). Each namespace corresponds to one
//! schema in which entities are plain integers. A request for "all
//! transactions touching X" is answered by:
//! * translating X into its namespace and numeric local id ([`namespace`]);
//! * building a parameterized query that matches X as sender *or* receiver,
//!   optionally restricted to a set of counterparts, a date range, an order
//!   and a row cap ([`query`]);
//! * running it on a pooled connection of its own ([`pool`], [`executor`]);
//! * turning each row into a [`model::Link`] whose endpoints are global ids
//!   again and whose properties carry the id, time, both amounts, the
//!   direction seen from X and a short annotation ([`mapper`]).
//!
//! Requests over several entities are answered entity by entity and the
//! results concatenated ([`access`]).
//!
//! ## Modules
//! * [`access`] – [`access::TransactionDataAccess`], the entry point.
//! * [`model`] – identifiers, links, properties, requests and result sets.
//! * [`namespace`] – the [`namespace::NamespaceHandler`] seam and id translation.
//! * [`query`] – the query builder and its ordered bind slots.
//! * [`pool`] – the [`pool::ConnectionPool`] seam and the r2d2 SQLite pool.
//! * [`executor`] – scoped execution and raw rows.
//! * [`mapper`] – rows to links.
//! * [`settings`] – table, dialect and annotation settings read with `config`.
//! * [`error`] – [`error::LedgerlinkError`].
//!
//! ## Quick Start
//! ```no_run
//! use ledgerlink::access::TransactionDataAccess;
//! use ledgerlink::model::{GlobalEntityId, SortMode, TransactionRequest};
//! use ledgerlink::namespace::DelimitedNamespaceHandler;
//! use ledgerlink::settings::Settings;
//!
//! let settings = Settings::parse("database = \"bitcoin.db\"").unwrap();
//! let pool = ledgerlink::pool::open(&settings).unwrap();
//! let access = TransactionDataAccess::new(pool, DelimitedNamespaceHandler::new(["ns1"]), &settings).unwrap();
//! let request = TransactionRequest::new(vec![GlobalEntityId::from("acct:ns1:42")])
//!     .with_sort(SortMode::Date)
//!     .with_max_results(10);
//! let results = access.get_transactions(&request).unwrap();
//! println!("{} transactions", results.total);
//! ```

pub mod access;
pub mod error;
pub mod executor;
pub mod mapper;
pub mod model;
pub mod namespace;
pub mod pool;
pub mod query;
pub mod settings;
