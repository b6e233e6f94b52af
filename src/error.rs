//! Error types for revgrad

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Type mismatch: {got} is not supported, wrap it with as_array first")]
    TypeMismatch { got: String },

    #[error("Variable {0} has no data")]
    EmptyPayload(String),

    #[error("Gradient of output {0} was never seeded")]
    UnseededGradient(String),

    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Invalid gradient: {0}")]
    InvalidGradient(String),

    #[error("Creator already set for variable {0}")]
    CreatorAlreadySet(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
