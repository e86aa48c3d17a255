//! Tabula Value - scalar value type shared by the record query engine
//!
//! This crate provides:
//! - The `Value` type for every cell a table can hold
//! - The `DataType` describing a column's native type
//! - Native-type comparison, hashing and a total order for sort keys
//! - Coercion of literal values to a column's type
//! - Plain JSON serialization for response bodies

pub mod coercion;
pub mod data_type;
pub mod error;
pub mod types;

pub use data_type::DataType;
pub use error::{Error, Result};
pub use types::{Row, Value};
