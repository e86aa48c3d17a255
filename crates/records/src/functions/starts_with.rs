//! starts_with - text prefix test

use super::helpers::{arg, expect_text, to_text};
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct StartsWithFunction;

impl DbFunction for StartsWithFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "starts_with",
            arity: Arity::Exact(2),
            coerce_literals: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        expect_text(&arg_types[0])?;
        expect_text(&arg_types[1])?;
        Ok(DataType::Bool)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let text = to_text(arg(args, 0, "starts_with")?)?;
        let prefix = to_text(arg(args, 1, "starts_with")?)?;
        Ok(match (text, prefix) {
            (Some(text), Some(prefix)) => Value::Bool(text.starts_with(prefix)),
            _ => Value::Null,
        })
    }
}

/// Register the starts_with function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(StartsWithFunction));
}
