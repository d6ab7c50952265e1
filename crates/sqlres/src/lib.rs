//! # sqlres
//!
//! Dynamic SQL statement generation for table-backed resources.
//!
//! A resource spans one or two joined tables (parent/child). A generic
//! [`Request`] — identifier selectors, filter parameters, pagination — is
//! translated into two synchronized outputs: a literal executable statement
//! and a parameterized template with an ordered bound-value list.
//!
//! ## Features
//!
//! - **Two views, one token stream**: literal and prepared SQL render from
//!   the same ordered fragment/bind sequence, so they cannot drift apart
//! - **Nine comparison operators** with NULL predicates and
//!   wildcard-triggered LIKE promotion
//! - **Column rules enforced**: read-only and non-queried foreign-key
//!   columns are rejected or skipped per request
//! - **Pluggable dialects**: pagination, placeholders, qualified naming,
//!   and sequence statements behind one capability trait
//!
//! ## Example
//!
//! ```ignore
//! use sqlres::{Dialect, Request, RequestValue, StatementBuilder};
//!
//! let builder = StatementBuilder::new(Dialect::MySql.hooks());
//! let request = Request::select()
//!     .parameter(RequestValue::eq("title", "ACADEMY%"))
//!     .limit(10, 0);
//! let statement = builder.build_select(&metadata, "SELECT id, title FROM film", &request)?;
//!
//! // statement.literal:  SELECT id, title FROM film WHERE film.title LIKE 'ACADEMY%' ORDER BY film.id LIMIT 10 OFFSET 0
//! // statement.prepared: SELECT id, title FROM film WHERE film.title LIKE ? ORDER BY film.id LIMIT 10 OFFSET 0
//! // statement.values:   ["ACADEMY%"]
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod metadata;
pub mod request;
pub mod sequence;
pub mod sql;

pub use builder::StatementBuilder;
pub use dialect::{Dialect, DialectHooks, MsSql, MySql, Postgres};
pub use error::{InvalidRequest, SqlError, SqlResult};
pub use metadata::{
    ColumnMetaData, MetadataProvider, SqlResourceMetaData, TableMetaData, TableRole, resolve_table,
};
pub use request::{Operator, Request, RequestKind, RequestValue, Scalar};
pub use sequence::{ExecutionError, ExecutorProvider, SequenceExecutor, SequenceManager};
pub use sql::{SqlStruct, Statement};
