//! Engine trait definitions for direct solvers.
//!
//! These traits abstract over the concrete factorization library. The
//! adapter only ever talks to a `Box<dyn DirectEngine>` obtained by name
//! from an `EngineBackend`.

use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use thiserror::Error;

/// Failure status reported by an engine phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("operator is not square ({nrows}x{ncols})")]
    NotSquare { nrows: usize, ncols: usize },

    #[error("operator is empty")]
    Empty,

    #[error("operator is structurally singular (row or column {index} has no entries)")]
    StructurallySingular { index: usize },

    #[error("sparsity pattern differs from the symbolic factorization")]
    PatternChanged,

    #[error("operator is numerically singular")]
    Singular,

    #[error("operator is not positive definite")]
    NotPositiveDefinite,

    #[error("operator is not symmetric")]
    NotSymmetric,

    #[error("no numeric factorization available")]
    NotFactored,

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// A direct factorization engine.
///
/// Lifecycle: `symbolic_factorization` analyses the sparsity pattern,
/// `numeric_factorization` computes factor values for that pattern and
/// `solve` applies the factors. The counters report how many phases have
/// completed successfully over the engine's lifetime.
pub trait DirectEngine: Send {
    /// Registered name of this engine (e.g., "Lapack").
    fn name(&self) -> &str;

    fn symbolic_factorization(&mut self, operator: &CsrMatrix<f64>) -> Result<(), EngineError>;

    fn numeric_factorization(&mut self, operator: &CsrMatrix<f64>) -> Result<(), EngineError>;

    /// Solve with the current factors, writing the result into `lhs`.
    fn solve(&mut self, rhs: &DVector<f64>, lhs: &mut DVector<f64>) -> Result<(), EngineError>;

    /// Number of successful symbolic factorizations.
    fn num_symbolic_fact(&self) -> usize;

    /// Number of successful numeric factorizations.
    fn num_numeric_fact(&self) -> usize;

    fn set_use_transpose(&mut self, use_transpose: bool);

    fn use_transpose(&self) -> bool;
}

/// Capability interface selecting engines by name.
pub trait EngineBackend {
    /// Whether any direct solver support is present in this build.
    fn is_compiled(&self) -> bool;

    /// Whether an engine is registered under `name`.
    fn query(&self, name: &str) -> bool;

    /// Instantiate the engine registered under `name`.
    fn create(&self, name: &str) -> Option<Box<dyn DirectEngine>>;

    /// Names of all engines this backend can create.
    fn engine_names(&self) -> Vec<String>;
}

/// Checks shared by the engines' symbolic phases: the operator must be
/// square, non-empty, and every row and column must hold an entry.
pub(crate) fn check_structure(operator: &CsrMatrix<f64>) -> Result<(), EngineError> {
    let (nrows, ncols) = (operator.nrows(), operator.ncols());
    if nrows != ncols {
        return Err(EngineError::NotSquare { nrows, ncols });
    }
    if nrows == 0 {
        return Err(EngineError::Empty);
    }

    if let Some(row) = operator
        .row_offsets()
        .windows(2)
        .position(|w| w[0] == w[1])
    {
        return Err(EngineError::StructurallySingular { index: row });
    }

    let mut column_hit = vec![false; ncols];
    for &col in operator.col_indices() {
        column_hit[col] = true;
    }
    if let Some(col) = column_hit.iter().position(|hit| !hit) {
        return Err(EngineError::StructurallySingular { index: col });
    }

    Ok(())
}
