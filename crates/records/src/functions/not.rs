//! not - boolean negation

use super::helpers::{arg, expect_boolean, to_tristate};
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct NotFunction;

impl DbFunction for NotFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "not",
            arity: Arity::Exact(1),
            coerce_literals: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        expect_boolean(&arg_types[0])?;
        Ok(DataType::Bool)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        // NOT NULL = NULL
        Ok(match to_tristate(arg(args, 0, "not")?)? {
            Some(b) => Value::Bool(!b),
            None => Value::Null,
        })
    }
}

/// Register the not function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(NotFunction));
}
