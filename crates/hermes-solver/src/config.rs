//! Direct solver configuration.
//!
//! Selects the engine by name and presets the factorization scheme and the
//! transpose flag. Loadable from JSON; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::LapackEngine;
use crate::error::Result;
use crate::linear_solver::FactorizationScheme;

/// Configuration of a `DirectSolver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectSolverConfig {
    /// Engine name as registered in the backend (e.g., "Lapack", "Cholesky").
    pub engine: String,
    pub factorization_scheme: FactorizationScheme,
    /// Solve with the operator's transpose.
    pub use_transpose: bool,
}

impl Default for DirectSolverConfig {
    fn default() -> Self {
        Self {
            engine: LapackEngine::NAME.to_string(),
            factorization_scheme: FactorizationScheme::FromScratch,
            use_transpose: false,
        }
    }
}

impl DirectSolverConfig {
    /// Create a configuration for the given engine with default settings.
    pub fn for_engine(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            ..Self::default()
        }
    }

    pub fn with_factorization_scheme(mut self, scheme: FactorizationScheme) -> Self {
        self.factorization_scheme = scheme;
        self
    }

    pub fn with_transpose(mut self, use_transpose: bool) -> Self {
        self.use_transpose = use_transpose;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
