//! The record data model: column identifiers, schemas, records and directives.

pub mod column;
pub mod query;
pub mod record;
pub mod schema;

pub use column::{ColumnId, ColumnMapping, ColumnName, ColumnRef};
pub use query::{Direction, GroupMode, GroupSpecification, SortDirective};
pub use record::Record;
pub use schema::{Column, Table};
pub use tabula_value::{DataType, Row, Value};
