//! Helper functions for DB function implementations

use crate::error::{Error, Result};
use crate::types::{DataType, Value};

/// Fetch an argument that the registry's arity check guarantees
pub fn arg<'a>(args: &'a [Value], index: usize, id: &str) -> Result<&'a Value> {
    args.get(index)
        .ok_or_else(|| Error::ExecutionError(format!("{} is missing argument {}", id, index)))
}

/// Check that an argument type is boolean (or an untyped NULL)
pub fn expect_boolean(arg_type: &DataType) -> Result<()> {
    match arg_type {
        DataType::Bool | DataType::Null => Ok(()),
        other => Err(Error::TypeMismatch {
            expected: DataType::Bool.to_string(),
            found: other.to_string(),
        }),
    }
}

/// Check that an argument type is text (or an untyped NULL)
pub fn expect_text(arg_type: &DataType) -> Result<()> {
    match arg_type {
        DataType::Str | DataType::Null => Ok(()),
        other => Err(Error::TypeMismatch {
            expected: DataType::Str.to_string(),
            found: other.to_string(),
        }),
    }
}

/// Interpret a runtime value as a nullable boolean
pub fn to_tristate(value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        other => Err(Error::TypeMismatch {
            expected: DataType::Bool.to_string(),
            found: other.data_type().to_string(),
        }),
    }
}

/// Interpret a runtime value as nullable text
pub fn to_text(value: &Value) -> Result<Option<&str>> {
    match value {
        Value::Null => Ok(None),
        Value::Str(s) => Ok(Some(s)),
        other => Err(Error::TypeMismatch {
            expected: DataType::Str.to_string(),
            found: other.data_type().to_string(),
        }),
    }
}
