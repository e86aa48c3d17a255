//! equal - native-type equality

use super::helpers::arg;
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::{DataType, Value};
use std::cmp::Ordering;

pub struct EqualFunction;

impl DbFunction for EqualFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "equal",
            arity: Arity::Exact(2),
            coerce_literals: true,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let (left, right) = (&arg_types[0], &arg_types[1]);
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
        let left = arg(args, 0, "equal")?;
        let right = arg(args, 1, "equal")?;

        // NULL comparison always returns NULL
        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }

        match left.compare(right) {
            Some(ordering) => Ok(Value::Bool(ordering == Ordering::Equal)),
            // JSON has no order but still has equality
            None if left.data_type() == right.data_type() => Ok(Value::Bool(left == right)),
            None => Err(Error::TypeMismatch {
                expected: left.data_type().to_string(),
                found: right.data_type().to_string(),
            }),
        }
    }
}

/// Register the equal function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(EqualFunction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equal_validate() {
        let func = EqualFunction;
        assert_eq!(
            func.validate(&[DataType::Str, DataType::Str]).unwrap(),
            DataType::Bool
        );
        assert_eq!(
            func.validate(&[DataType::I64, DataType::Decimal]).unwrap(),
            DataType::Bool
        );
        assert_eq!(
            func.validate(&[DataType::Date, DataType::Null]).unwrap(),
            DataType::Bool
        );
        assert!(func.validate(&[DataType::Date, DataType::Bool]).is_err());
    }

    #[test]
    fn test_equal_execute() {
        let func = EqualFunction;
        assert_eq!(
            func.execute(&[Value::string("Ames"), Value::string("Ames")])
                .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            func.execute(&[Value::integer(2), Value::float(2.0)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            func.execute(&[Value::Json(json!({"a": 1})), Value::Json(json!({"a": 1}))])
                .unwrap(),
            Value::Bool(true)
        );

        // NULL handling
        assert_eq!(
            func.execute(&[Value::Null, Value::string("Ames")]).unwrap(),
            Value::Null
        );
    }
}
