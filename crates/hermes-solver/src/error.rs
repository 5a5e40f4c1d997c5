//! Error types for hermes-solver

use std::fmt;
use thiserror::Error;

use crate::backend::EngineError;

pub type Result<T> = std::result::Result<T, SolverError>;

/// Factorization phase that reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorizationPhase {
    Symbolic,
    Numeric,
}

impl fmt::Display for FactorizationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorizationPhase::Symbolic => write!(f, "Symbolic"),
            FactorizationPhase::Numeric => write!(f, "Numeric"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("direct solver backend not compiled. Rebuild with --features direct")]
    BackendNotCompiled,

    #[error("unknown direct solver engine: {0}")]
    UnknownEngine(String),

    #[error("{phase} factorization failed: {source}")]
    Factorization {
        phase: FactorizationPhase,
        #[source]
        source: EngineError,
    },

    #[error("solution failed: {0}")]
    Solve(#[source] EngineError),

    #[error("not yet implemented: {0}")]
    NotImplemented(&'static str),

    #[error("invalid linear system: {0}")]
    InvalidSystem(String),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SolverError {
    /// True for failures of the factorization phases, which callers treat
    /// as recoverable (warning) rather than hard errors.
    pub fn is_factorization_failure(&self) -> bool {
        matches!(self, SolverError::Factorization { .. })
    }
}
