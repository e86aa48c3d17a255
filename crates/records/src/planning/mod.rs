//! Query planning: compiling request directives into executable plans

mod compiler;
pub mod plan;

pub use compiler::{QuerySpec, compile};
pub use plan::{CompiledExpression, CountQuery, ExecutableQuery, FunctionRef, Node};
