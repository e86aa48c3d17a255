//! Error types for value conversion

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Cannot coerce {value} to {target}")]
    Coercion { value: String, target: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
