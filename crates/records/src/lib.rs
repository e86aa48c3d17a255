//! Tabula Records - filtered, sorted, grouped and paginated record listings
//!
//! This crate provides:
//! - A JSON expression language for filters and column transforms, with
//!   external column ids rewritten to internal names per request
//! - A registry of DB functions validated and typed at compile time
//! - A query compiler producing one plan for filter, projection,
//!   duplicate-only, dedupe, order and window
//! - Distinct and percentile grouping of a result page
//! - A stateless paginator assembling `{count, grouping, results}` pages
//! - A storage boundary with an in-memory engine and a count cache

pub mod config;
pub mod error;
pub mod execution;
pub mod expression;
pub mod functions;
pub mod grouping;
pub mod pagination;
pub mod planning;
pub mod request;
pub mod storage;
pub mod types;

pub use config::PaginationConfig;
pub use error::{Error, Parameter, Result};
pub use expression::Expression;
pub use grouping::{GroupResult, Grouping};
pub use pagination::{Page, Paginator};
pub use planning::{ExecutableQuery, QuerySpec, compile};
pub use request::PageRequest;
pub use storage::{CachedTable, ColumnIdentifiers, CountCache, MemoryTable, TableDescriptor};
pub use types::{
    Column, ColumnId, ColumnMapping, ColumnName, ColumnRef, DataType, Direction, GroupMode,
    GroupSpecification, Record, Row, SortDirective, Table, Value,
};
