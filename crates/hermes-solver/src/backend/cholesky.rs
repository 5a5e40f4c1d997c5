//! Sparse Cholesky engine using nalgebra-sparse.
//!
//! For symmetric positive definite operators, which is what most linear
//! static FE systems produce. The symbolic phase computes the fill pattern
//! of the factor once; later numeric factorizations reuse it as long as
//! the operator's pattern is unchanged.

use super::traits::*;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::{CscCholesky, CscSymbolicCholesky};
use nalgebra_sparse::pattern::SparsityPattern;
use nalgebra_sparse::{CscMatrix, CsrMatrix};

/// Sparse Cholesky factorization engine.
///
/// Only the lower triangle enters the factorization, so non-symmetric
/// operators are rejected by the numeric phase. The transpose flag is
/// recorded but has no effect on the result.
pub struct CholeskyEngine {
    /// CSR pattern of the operator seen by the symbolic phase.
    pattern: Option<SparsityPattern>,
    symbolic: Option<CscSymbolicCholesky>,
    factor: Option<CscCholesky<f64>>,
    n: usize,
    use_transpose: bool,
    num_symbolic: usize,
    num_numeric: usize,
}

impl CholeskyEngine {
    pub const NAME: &'static str = "Cholesky";

    pub fn new() -> Self {
        Self {
            pattern: None,
            symbolic: None,
            factor: None,
            n: 0,
            use_transpose: false,
            num_symbolic: 0,
            num_numeric: 0,
        }
    }
}

/// Whether `operator` equals its transpose, up to round-off relative to
/// its largest entry.
fn is_symmetric(operator: &CsrMatrix<f64>) -> bool {
    let transposed = operator.transpose();
    if transposed.pattern() != operator.pattern() {
        return false;
    }
    let scale = operator
        .values()
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tol = 1e-12 * scale;
    operator
        .values()
        .iter()
        .zip(transposed.values())
        .all(|(a, b)| (a - b).abs() <= tol)
}

impl Default for CholeskyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectEngine for CholeskyEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn symbolic_factorization(&mut self, operator: &CsrMatrix<f64>) -> Result<(), EngineError> {
        check_structure(operator)?;

        let csc = CscMatrix::from(operator);
        self.symbolic = Some(CscSymbolicCholesky::factor(csc.pattern().clone()));
        self.pattern = Some(operator.pattern().clone());
        self.factor = None;
        self.n = operator.nrows();
        self.num_symbolic += 1;
        Ok(())
    }

    fn numeric_factorization(&mut self, operator: &CsrMatrix<f64>) -> Result<(), EngineError> {
        match &self.pattern {
            Some(pattern) if pattern == operator.pattern() => {}
            _ => return Err(EngineError::PatternChanged),
        }
        let symbolic = self.symbolic.clone().ok_or(EngineError::PatternChanged)?;
        if !is_symmetric(operator) {
            self.factor = None;
            return Err(EngineError::NotSymmetric);
        }

        // Same pattern as the symbolic phase, so the CSC value order matches
        let csc = CscMatrix::from(operator);
        match CscCholesky::factor_numerical(symbolic, csc.values()) {
            Ok(factor) => {
                self.factor = Some(factor);
                self.num_numeric += 1;
                Ok(())
            }
            Err(_) => {
                self.factor = None;
                Err(EngineError::NotPositiveDefinite)
            }
        }
    }

    fn solve(&mut self, rhs: &DVector<f64>, lhs: &mut DVector<f64>) -> Result<(), EngineError> {
        let factor = self.factor.as_ref().ok_or(EngineError::NotFactored)?;
        if rhs.len() != self.n {
            return Err(EngineError::DimensionMismatch {
                expected: self.n,
                found: rhs.len(),
            });
        }
        if lhs.len() != self.n {
            return Err(EngineError::DimensionMismatch {
                expected: self.n,
                found: lhs.len(),
            });
        }

        let b = DMatrix::from_column_slice(self.n, 1, rhs.as_slice());
        let x = factor.solve(&b);
        if x.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::Singular);
        }
        lhs.as_mut_slice().copy_from_slice(x.as_slice());
        Ok(())
    }

    fn num_symbolic_fact(&self) -> usize {
        self.num_symbolic
    }

    fn num_numeric_fact(&self) -> usize {
        self.num_numeric
    }

    fn set_use_transpose(&mut self, use_transpose: bool) {
        self.use_transpose = use_transpose;
    }

    fn use_transpose(&self) -> bool {
        self.use_transpose
    }
}
