//! Column data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Native type of a column, or of a value produced by an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    I64,
    F64,
    Decimal,
    Str,
    Date,
    Time,
    Timestamp,
    Uuid,
    // Schemaless JSON, no total order
    Json,
    // Type of a NULL literal
    Null,
}

impl DataType {
    /// Check if this type is numeric (integer, float, or decimal)
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::I64 | DataType::F64 | DataType::Decimal)
    }

    /// Check if values of this type have a total order.
    ///
    /// Percentile grouping and range comparisons are only defined for
    /// orderable types.
    pub fn is_orderable(&self) -> bool {
        !matches!(self, DataType::Json)
    }

    /// Check if two types can be compared with each other
    pub fn is_comparable_with(&self, other: &DataType) -> bool {
        match (self, other) {
            (DataType::Null, _) | (_, DataType::Null) => true,
            (a, b) if a == b => true,
            (a, b) => a.is_numeric() && b.is_numeric(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::I64 => write!(f, "BIGINT"),
            DataType::F64 => write!(f, "DOUBLE PRECISION"),
            DataType::Decimal => write!(f, "NUMERIC"),
            DataType::Str => write!(f, "TEXT"),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Uuid => write!(f, "UUID"),
            DataType::Json => write!(f, "JSON"),
            DataType::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparable_types() {
        assert!(DataType::I64.is_comparable_with(&DataType::Decimal));
        assert!(DataType::Str.is_comparable_with(&DataType::Null));
        assert!(!DataType::Str.is_comparable_with(&DataType::Date));
    }

    #[test]
    fn test_orderable() {
        assert!(DataType::Date.is_orderable());
        assert!(!DataType::Json.is_orderable());
    }
}
