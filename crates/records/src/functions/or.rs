//! or - boolean disjunction over one or more arguments

use super::helpers::{expect_boolean, to_tristate};
use super::{Arity, DbFunction, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::types::{DataType, Value};

pub struct OrFunction;

impl DbFunction for OrFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            id: "or",
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
        // Three-valued logic: any TRUE wins, otherwise any NULL makes NULL
        let mut saw_null = false;
        for value in args {
            match to_tristate(value)? {
                Some(true) => return Ok(Value::Bool(true)),
                Some(false) => {}
                None => saw_null = true,
            }
        }
        Ok(if saw_null {
            Value::Null
        } else {
            Value::Bool(false)
        })
    }
}

/// Register the or function
pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(OrFunction));
}
