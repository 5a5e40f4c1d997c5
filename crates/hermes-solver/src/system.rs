//! Linear system collaborators: sparse operator and dense right-hand side.
//!
//! Assembly hands over COO triplets; the operator is kept in CSR format,
//! which is what the factorization engines consume.

use nalgebra::{ComplexField, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::error::{Result, SolverError};

/// Sparse matrix in COO (coordinate/triplet) format.
///
/// Duplicate `(row, col)` entries are summed when the triplets are turned
/// into a [`SystemMatrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct SparseTriplets<S> {
    pub nrows: usize,
    pub ncols: usize,
    pub row_indices: Vec<usize>,
    pub col_indices: Vec<usize>,
    pub values: Vec<S>,
}

impl<S> SparseTriplets<S> {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            row_indices: Vec::new(),
            col_indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append one entry.
    pub fn push(&mut self, row: usize, col: usize, value: S) {
        self.row_indices.push(row);
        self.col_indices.push(col);
        self.values.push(value);
    }

    /// Number of stored entries (duplicates counted separately).
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// System operator, stored in CSR format.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMatrix<S: ComplexField> {
    csr: CsrMatrix<S>,
}

impl<S: ComplexField> SystemMatrix<S> {
    /// Build the operator from COO triplets.
    pub fn from_triplets(triplets: &SparseTriplets<S>) -> Result<Self> {
        if triplets.row_indices.len() != triplets.values.len()
            || triplets.col_indices.len() != triplets.values.len()
        {
            return Err(SolverError::InvalidSystem(format!(
                "triplet arrays differ in length: {} rows, {} cols, {} values",
                triplets.row_indices.len(),
                triplets.col_indices.len(),
                triplets.values.len()
            )));
        }

        let coo = CooMatrix::try_from_triplets(
            triplets.nrows,
            triplets.ncols,
            triplets.row_indices.clone(),
            triplets.col_indices.clone(),
            triplets.values.clone(),
        )
        .map_err(|err| SolverError::InvalidSystem(err.to_string()))?;

        Ok(Self {
            csr: CsrMatrix::from(&coo),
        })
    }

    pub fn from_csr(csr: CsrMatrix<S>) -> Self {
        Self { csr }
    }

    pub fn nrows(&self) -> usize {
        self.csr.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.csr.ncols()
    }

    /// System dimension (row count).
    pub fn size(&self) -> usize {
        self.csr.nrows()
    }

    pub fn nnz(&self) -> usize {
        self.csr.nnz()
    }

    /// The CSR storage handed to the factorization engine.
    pub fn csr(&self) -> &CsrMatrix<S> {
        &self.csr
    }
}

/// Right-hand side (or any dense system vector).
#[derive(Debug, Clone, PartialEq)]
pub struct SystemVector<S: ComplexField> {
    vec: DVector<S>,
}

impl<S: ComplexField> SystemVector<S> {
    pub fn from_vec(values: Vec<S>) -> Self {
        Self {
            vec: DVector::from_vec(values),
        }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            vec: DVector::zeros(len),
        }
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<S> {
        self.vec.get(index).cloned()
    }

    pub fn as_slice(&self) -> &[S] {
        self.vec.as_slice()
    }

    /// The dense storage handed to the factorization engine.
    pub fn as_dvector(&self) -> &DVector<S> {
        &self.vec
    }
}

impl<S: ComplexField> From<DVector<S>> for SystemVector<S> {
    fn from(vec: DVector<S>) -> Self {
        Self { vec }
    }
}
