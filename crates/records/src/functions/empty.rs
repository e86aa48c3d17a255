//! empty - true when the argument is NULL

use super::helpers::arg;
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct EmptyFunction;

impl DbFunction for EmptyFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "empty",
            arity: Arity::Exact(1),
            coerce_literals: false,
        };
        &SIGNATURE
    }

    fn validate(&self, _arg_types: &[DataType]) -> Result<DataType> {
        Ok(DataType::Bool)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Bool(arg(args, 0, "empty")?.is_null()))
    }
}

/// Register the empty function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(EmptyFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let func = EmptyFunction;
        assert_eq!(func.execute(&[Value::Null]).unwrap(), Value::Bool(true));
        // An empty string is a value, not a NULL
        assert_eq!(func.execute(&[Value::string("")]).unwrap(), Value::Bool(false));
        assert_eq!(func.validate(&[DataType::Json]).unwrap(), DataType::Bool);
    }
}
