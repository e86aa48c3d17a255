//! Error types for the record query engine

use crate::types::ColumnId;
use std::fmt;
use tabula_value::DataType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Request parameter an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Filter,
    Function,
    OrderBy,
    Grouping,
    DuplicateOnly,
    Deduplicate,
    Limit,
    Offset,
}

impl Parameter {
    /// Name of the parameter as it appears in a request
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Filter => "filter",
            Parameter::Function => "db_function",
            Parameter::OrderBy => "order_by",
            Parameter::Grouping => "grouping",
            Parameter::DuplicateOnly => "duplicate_only",
            Parameter::Deduplicate => "deduplicate",
            Parameter::Limit => "limit",
            Parameter::Offset => "offset",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Column resolution errors
    #[error("Column ids could not be resolved: {0:?}")]
    UnresolvedColumn(Vec<ColumnId>),

    #[error("Referenced columns don't exist: {}", .0.join(", "))]
    ReferencedColumnsDontExist(Vec<String>),

    // Function errors
    #[error("Unknown function id: {0}")]
    UnknownOperator(String),

    #[error("Bad function format: {0}")]
    BadFunctionFormat(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    // Sort errors
    #[error("Bad sort format: {0}")]
    BadSortFormat(String),

    #[error("Sort field not found: {0}")]
    SortFieldNotFound(String),

    // Grouping errors
    #[error("Bad group format: {0}")]
    BadGroupFormat(String),

    #[error("Group field not found: {0}")]
    GroupFieldNotFound(String),

    #[error("Column {column} of type {data_type} cannot be grouped by percentile")]
    InvalidGroupType { column: String, data_type: DataType },

    #[error("Bad duplicate_only format: {0}")]
    BadDuplicateOnlyFormat(String),

    // Storage errors
    #[error("null value in column \"{column}\" of relation \"{table}\" violates not-null constraint")]
    NotNullViolation { table: String, column: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid {parameter}: {source}")]
    Parameter {
        parameter: Parameter,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Tag this error with the request parameter it originated from.
    ///
    /// An error that is already tagged keeps its original parameter.
    pub fn at(self, parameter: Parameter) -> Error {
        match self {
            Error::Parameter { .. } => self,
            other => Error::Parameter {
                parameter,
                source: Box::new(other),
            },
        }
    }

    /// The request parameter this error is tagged with, if any
    pub fn parameter(&self) -> Option<Parameter> {
        match self {
            Error::Parameter { parameter, .. } => Some(*parameter),
            _ => None,
        }
    }

    /// The untagged error
    pub fn kind(&self) -> &Error {
        match self {
            Error::Parameter { source, .. } => source.kind(),
            other => other,
        }
    }

    /// Stable machine-readable code for rendering error bodies
    pub fn code(&self) -> &'static str {
        match self.kind() {
            Error::UnresolvedColumn(_) => "unresolved_column",
            Error::ReferencedColumnsDontExist(_) => "referenced_columns_dont_exist",
            Error::UnknownOperator(_) => "unknown_db_function_id",
            Error::BadFunctionFormat(_) => "bad_db_function_format",
            Error::TypeMismatch { .. } => "type_mismatch",
            Error::BadSortFormat(_) => "bad_sort_format",
            Error::SortFieldNotFound(_) => "sort_field_not_found",
            Error::BadGroupFormat(_) => "bad_group_format",
            Error::GroupFieldNotFound(_) => "group_field_not_found",
            Error::InvalidGroupType { .. } => "invalid_group_type",
            Error::BadDuplicateOnlyFormat(_) => "bad_duplicate_only_format",
            Error::NotNullViolation { .. } => "not_null_violation",
            Error::InvalidValue(_) => "invalid_value",
            Error::ExecutionError(_) => "execution_error",
            Error::Storage(_) => "storage_error",
            Error::Parameter { .. } => unreachable!("kind() never returns a tagged error"),
        }
    }
}

impl From<tabula_value::Error> for Error {
    fn from(err: tabula_value::Error) -> Self {
        match err {
            tabula_value::Error::Coercion { value, target } => Error::TypeMismatch {
                expected: target,
                found: value,
            },
            tabula_value::Error::InvalidValue(msg) => Error::InvalidValue(msg),
        }
    }
}
