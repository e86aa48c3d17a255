//! DB function definitions and registry
//!
//! Every operator an expression tree may call is a registry entry: a signature
//! (id, arity, literal coercion), a type check run at compile time, and the
//! evaluation used by the executor. Adding an operator means adding a file
//! here and registering it, the expression tree never changes shape.

use crate::error::{Error, Result};
use crate::types::{DataType, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

mod helpers;

// Comparison functions
mod comparison;
mod equal;

// Boolean functions
mod and;
mod not;
mod or;

// Null and passthrough functions
mod empty;
mod identity;

// Text functions
mod contains;
mod starts_with;
mod to_lowercase;

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }
}

/// Metadata about a function's signature
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    /// Stable function id used in expression trees
    pub id: &'static str,
    /// Accepted argument count
    pub arity: Arity,
    /// Whether literal arguments are coerced to the type of the other operand
    pub coerce_literals: bool,
}

/// Trait for DB functions
pub trait DbFunction: Send + Sync {
    /// Get the function's signature
    fn signature(&self) -> &FunctionSignature;

    /// Validate argument types and return the result type
    fn validate(&self, arg_types: &[DataType]) -> Result<DataType>;

    /// Execute the function with runtime values
    fn execute(&self, args: &[Value]) -> Result<Value>;
}

/// Registry of all available DB functions
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Box<dyn DbFunction>>,
}

impl FunctionRegistry {
    /// Create a new function registry with all builtin functions
    fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        // Register comparison functions
        equal::register(&mut registry);
        comparison::register(&mut registry);

        // Register boolean functions
        not::register(&mut registry);
        and::register(&mut registry);
        or::register(&mut registry);

        // Register null and passthrough functions
        empty::register(&mut registry);
        identity::register(&mut registry);

        // Register text functions
        starts_with::register(&mut registry);
        contains::register(&mut registry);
        to_lowercase::register(&mut registry);

        registry
    }

    /// Register a function
    fn register(&mut self, function: Box<dyn DbFunction>) {
        let id = function.signature().id;
        self.functions.insert(id, function);
    }
}

// Global static registry
static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::new);

/// Look up a function by id
pub fn get_function(id: &str) -> Option<&'static dyn DbFunction> {
    REGISTRY.functions.get(id).map(|f| f.as_ref())
}

/// Look up a function by id, failing for unknown ids
pub fn resolve(id: &str) -> Result<&'static dyn DbFunction> {
    get_function(id).ok_or_else(|| Error::UnknownOperator(id.to_string()))
}

/// All registered function ids, sorted
pub fn function_ids() -> Vec<&'static str> {
    let mut ids: Vec<_> = REGISTRY.functions.keys().copied().collect();
    ids.sort_unstable();
    ids
}

/// Check the argument count and types of a call and return its result type
pub fn validate_call(function: &dyn DbFunction, arg_types: &[DataType]) -> Result<DataType> {
    let signature = function.signature();
    if !signature.arity.accepts(arg_types.len()) {
        let expected = match signature.arity {
            Arity::Exact(n) => format!("exactly {}", n),
            Arity::AtLeast(n) => format!("at least {}", n),
        };
        return Err(Error::BadFunctionFormat(format!(
            "{} takes {} argument(s), got {}",
            signature.id,
            expected,
            arg_types.len()
        )));
    }
    function.validate(arg_types)
}
