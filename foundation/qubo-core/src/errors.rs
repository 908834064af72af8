//! Error types for QUBO encoding, validation and solving.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuboError>;

#[derive(Debug, Error)]
pub enum QuboError {
    #[error("solution vector has length {actual}, expected {expected} (n*c + c)")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("solution entry {index} is {value}, expected 0 or 1")]
    NonBinaryEntry { index: usize, value: u8 },

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("graph instance n={n} c={c} #{instance} not found at {path:?}")]
    InstanceNotFound {
        n: usize,
        c: usize,
        instance: usize,
        path: PathBuf,
    },

    #[error("invalid graph instance: {0}")]
    InvalidInstance(String),

    #[error("solver '{solver}' returned no candidate solutions")]
    SolverEmptyResult { solver: String },

    #[error("solver contract violated: {0}")]
    SolverContractViolation(String),

    #[error("solver error: {0}")]
    SolverError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QuboError {
    /// Whether a batch sweep may log this error and move on to the next instance.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QuboError::InstanceNotFound { .. })
    }
}
