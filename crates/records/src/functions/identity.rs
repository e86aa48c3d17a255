//! identity - returns its argument unchanged

use super::helpers::arg;
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct IdentityFunction;

impl DbFunction for IdentityFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "identity",
            arity: Arity::Exact(1),
            coerce_literals: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        Ok(arg_types[0])
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        arg(args, 0, "identity").cloned()
    }
}

/// Register the identity function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(IdentityFunction));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let func = IdentityFunction;
        assert_eq!(func.validate(&[DataType::Date]).unwrap(), DataType::Date);
        assert_eq!(
            func.execute(&[Value::string("KSC-12871")]).unwrap(),
            Value::string("KSC-12871")
        );
        assert_eq!(func.execute(&[Value::Null]).unwrap(), Value::Null);
    }
}
