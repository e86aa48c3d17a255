//! Expression evaluation
//!
//! Turns a compiled expression into a value using a row for column lookups.

use crate::error::{Error, Result};
use crate::planning::plan::CompiledExpression;
use crate::types::{Row, Value};

/// Evaluate an expression against a row
pub fn evaluate(expr: &CompiledExpression, row: &Row) -> Result<Value> {
    match expr {
        CompiledExpression::Constant(value) => Ok(value.clone()),

        CompiledExpression::Column(i) => row.get(*i).cloned().ok_or_else(|| {
            Error::ExecutionError(format!(
                "column index {} out of bounds for row of {}",
                i,
                row.len()
            ))
        }),

        CompiledExpression::Call { function, args } => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, row))
                .collect::<Result<Vec<_>>>()?;
            function.0.execute(&values)
        }
    }
}

/// Evaluate a predicate, treating NULL as false
pub fn matches(predicate: &CompiledExpression, row: &Row) -> Result<bool> {
    match evaluate(predicate, row)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        other => Err(Error::TypeMismatch {
            expected: "BOOLEAN".into(),
            found: other.data_type().to_string(),
        }),
    }
}
