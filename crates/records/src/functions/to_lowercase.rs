//! to_lowercase - converts text to lowercase

use super::helpers::{arg, expect_text, to_text};
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct ToLowercaseFunction;

impl DbFunction for ToLowercaseFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "to_lowercase",
            arity: Arity::Exact(1),
            coerce_literals: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        expect_text(&arg_types[0])?;
        Ok(DataType::Str)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(match to_text(arg(args, 0, "to_lowercase")?)? {
            Some(s) => Value::string(s.to_lowercase()),
            None => Value::Null,
        })
    }
}

/// Register the to_lowercase function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(ToLowercaseFunction));
}
