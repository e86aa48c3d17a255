//! Storage boundary
//!
//! The query engine never touches rows directly. It compiles a query against
//! a table's schema and hands it to a `TableDescriptor`, which runs it and
//! returns records. `ColumnIdentifiers` supplies the mapping from external
//! column ids to internal names used to rewrite incoming expressions.
//!
//! Two implementations ship with the crate:
//! - `MemoryTable` holds rows in memory and runs plans with the executor
//! - `CachedTable` wraps any descriptor and memoizes row counts in a
//!   `CountCache` until the owner invalidates the table

mod cache;
mod memory;

pub use cache::{CachedTable, CountCache};
pub use memory::MemoryTable;

use crate::error::Result;
use crate::planning::{CountQuery, ExecutableQuery};
use crate::types::{ColumnMapping, Record, Table};

/// A table the engine can query
pub trait TableDescriptor {
    /// The table's schema
    fn schema(&self) -> &Table;

    /// Run a compiled query, returning records in result order
    fn execute(&self, query: &ExecutableQuery) -> Result<Vec<Record>>;

    /// Count the rows of a query's unwindowed source
    fn count(&self, query: &CountQuery) -> Result<u64>;
}

/// Source of the external column id to internal name mapping
pub trait ColumnIdentifiers {
    fn column_id_to_name(&self) -> Result<ColumnMapping>;
}
