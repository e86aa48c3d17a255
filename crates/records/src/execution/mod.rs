//! Query execution module
//!
//! Runs compiled plans over rows held in memory. Storage engines that hold
//! their rows elsewhere translate `ExecutableQuery` themselves.

mod executor;
pub(crate) mod expression;

pub use executor::{Executor, Rows};
