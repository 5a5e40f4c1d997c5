//! Dense LU engine using nalgebra.
//!
//! The operator is reconstructed as a dense matrix and factored with
//! partial pivoting. Suitable for small-to-medium systems and for
//! non-symmetric operators; the symbolic phase only validates and records
//! the sparsity pattern.

use super::traits::*;
use nalgebra::linalg::LU;
use nalgebra::{DMatrix, DVector, Dyn};
use nalgebra_sparse::CsrMatrix;
use nalgebra_sparse::pattern::SparsityPattern;

/// Dense LU factorization engine.
pub struct LapackEngine {
    pattern: Option<SparsityPattern>,
    /// Dense copy of the operator from the last numeric factorization,
    /// kept so a change of the transpose flag can be re-factored.
    operator: Option<DMatrix<f64>>,
    factor: Option<LU<f64, Dyn, Dyn>>,
    factored_transposed: bool,
    use_transpose: bool,
    num_symbolic: usize,
    num_numeric: usize,
}

impl LapackEngine {
    pub const NAME: &'static str = "Lapack";

    pub fn new() -> Self {
        Self {
            pattern: None,
            operator: None,
            factor: None,
            factored_transposed: false,
            use_transpose: false,
            num_symbolic: 0,
            num_numeric: 0,
        }
    }

    fn factorize(&mut self) -> Result<(), EngineError> {
        let dense = self.operator.as_ref().ok_or(EngineError::NotFactored)?;
        let lu = if self.use_transpose {
            dense.transpose().lu()
        } else {
            dense.clone().lu()
        };

        if !lu.is_invertible() {
            self.factor = None;
            return Err(EngineError::Singular);
        }

        self.factor = Some(lu);
        self.factored_transposed = self.use_transpose;
        Ok(())
    }
}

impl Default for LapackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectEngine for LapackEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn symbolic_factorization(&mut self, operator: &CsrMatrix<f64>) -> Result<(), EngineError> {
        check_structure(operator)?;
        self.pattern = Some(operator.pattern().clone());
        self.operator = None;
        self.factor = None;
        self.num_symbolic += 1;
        Ok(())
    }

    fn numeric_factorization(&mut self, operator: &CsrMatrix<f64>) -> Result<(), EngineError> {
        match &self.pattern {
            Some(pattern) if pattern == operator.pattern() => {}
            _ => return Err(EngineError::PatternChanged),
        }

        // Reconstruct dense matrix from the CSR entries
        let n = operator.nrows();
        let mut dense = DMatrix::zeros(n, n);
        for (r, c, v) in operator.triplet_iter() {
            dense[(r, c)] += *v;
        }

        self.operator = Some(dense);
        self.factorize()?;
        self.num_numeric += 1;
        Ok(())
    }

    fn solve(&mut self, rhs: &DVector<f64>, lhs: &mut DVector<f64>) -> Result<(), EngineError> {
        if self.factor.is_none() {
            return Err(EngineError::NotFactored);
        }
        if self.factored_transposed != self.use_transpose {
            self.factorize()?;
        }

        let lu = self.factor.as_ref().ok_or(EngineError::NotFactored)?;
        let n = self.operator.as_ref().map_or(0, |a| a.nrows());
        if rhs.len() != n {
            return Err(EngineError::DimensionMismatch {
                expected: n,
                found: rhs.len(),
            });
        }
        if lhs.len() != n {
            return Err(EngineError::DimensionMismatch {
                expected: n,
                found: lhs.len(),
            });
        }

        let x = lu.solve(rhs).ok_or(EngineError::Singular)?;
        // Tiny but non-zero pivots pass `is_invertible` and overflow here
        if x.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::Singular);
        }
        lhs.copy_from(&x);
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
