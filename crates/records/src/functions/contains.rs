//! contains - substring test

use super::helpers::{arg, expect_text, to_text};
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct ContainsFunction;

impl DbFunction for ContainsFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "contains",
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
        let text = to_text(arg(args, 0, "contains")?)?;
        let needle = to_text(arg(args, 1, "contains")?)?;
        Ok(match (text, needle) {
            (Some(text), Some(needle)) => Value::Bool(text.contains(needle)),
            _ => Value::Null,
        })
    }
}

/// Register the contains function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(ContainsFunction));
}
