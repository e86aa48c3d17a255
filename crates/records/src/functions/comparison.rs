//! lesser, greater, lesser_or_equal, greater_or_equal - native-type ordering

use super::helpers::arg;
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::{DataType, Value};
use std::cmp::Ordering;

/// An ordering comparison, parameterized by which orderings satisfy it
pub struct ComparisonFunction {
    signature: FunctionSignature,
    accepts: fn(Ordering) -> bool,
}

impl ComparisonFunction {
    const fn new(id: &'static str, accepts: fn(Ordering) -> bool) -> Self {
        Self {
            signature: FunctionSignature {
                id,
                arity: Arity::Exact(2),
                coerce_literals: true,
            },
            accepts,
        }
    }
}

impl DbFunction for ComparisonFunction {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let (left, right) = (&arg_types[0], &arg_types[1]);

        for data_type in [left, right] {
            if !data_type.is_orderable() {
                return Err(Error::TypeMismatch {
                    expected: "orderable type".into(),
                    found: data_type.to_string(),
                });
            }
        }

        if left.is_comparable_with(right) {
            Ok(DataType::Bool)
        } else {
            Err(Error::TypeMismatch {
                expected: left.to_string(),
                found: right.to_string(),
            })
        }
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let id = self.signature.id;
        let left = arg(args, 0, id)?;
        let right = arg(args, 1, id)?;

        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }

        left.compare(right)
            .map(|ordering| Value::Bool((self.accepts)(ordering)))
            .ok_or_else(|| {
                Error::ExecutionError(format!(
                    "cannot compare {} with {}",
                    left.data_type(),
                    right.data_type()
                ))
            })
    }
}

/// Register the ordering comparisons
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(ComparisonFunction::new("lesser", Ordering::is_lt)));
    registry.register(Box::new(ComparisonFunction::new("greater", Ordering::is_gt)));
    registry.register(Box::new(ComparisonFunction::new(
        "lesser_or_equal",
        Ordering::is_le,
    )));
    registry.register(Box::new(ComparisonFunction::new(
        "greater_or_equal",
        Ordering::is_ge,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_comparisons() {
        let lesser = ComparisonFunction::new("lesser", Ordering::is_lt);
        let greater_or_equal = ComparisonFunction::new("greater_or_equal", Ordering::is_ge);

        assert_eq!(
            lesser.execute(&[Value::integer(9), Value::integer(10)]).unwrap(),
            Value::Bool(true)
        );
        // Strings compare lexically, so "9" sorts after "10"
        assert_eq!(
            lesser.execute(&[Value::string("9"), Value::string("10")]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            greater_or_equal
                .execute(&[Value::integer(10), Value::integer(10)])
                .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            lesser.execute(&[Value::Null, Value::integer(1)]).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let greater = ComparisonFunction::new("greater", Ordering::is_gt);
        let d = |y, m, d| Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(
            greater.execute(&[d(2010, 2, 1), d(2009, 12, 31)]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_json_not_orderable() {
        let lesser = ComparisonFunction::new("lesser", Ordering::is_lt);
        assert!(lesser.validate(&[DataType::Json, DataType::Json]).is_err());
        assert!(lesser.validate(&[DataType::Str, DataType::I64]).is_err());
    }
}
