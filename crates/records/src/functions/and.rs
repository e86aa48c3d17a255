//! and - boolean conjunction over one or more arguments

use super::helpers::{expect_boolean, to_tristate};
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct AndFunction;

impl DbFunction for AndFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "and",
            arity: Arity::AtLeast(1),
            coerce_literals: false,
        };
        &SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        arg_types.iter().try_for_each(expect_boolean)?;
        Ok(DataType::Bool)
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        // Three-valued logic: any FALSE wins, otherwise any NULL makes NULL
        let mut saw_null = false;
        for value in args {
            match to_tristate(value)? {
                Some(false) => return Ok(Value::Bool(false)),
                Some(true) => {}
                None => saw_null = true,
            }
        }
        Ok(if saw_null {
            Value::Null
        } else {
            Value::Bool(true)
        })
    }
}

/// Register the and function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(AndFunction));
}
