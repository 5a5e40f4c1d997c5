//! Direct sparse solver adapter for the finite element framework.
//!
//! This crate binds an assembled sparse system (`SystemMatrix` +
//! `SystemVector`) to a named factorization engine and drives the
//! symbolic/numeric factorization and solve lifecycle behind the uniform
//! [`LinearSolver`] contract.
//!
//! ```ignore
//! use hermes_solver::{default_backend, DirectSolver, LinearSolver, SystemMatrix, SystemVector};
//!
//! let backend = default_backend();
//! let mut solver = DirectSolver::new(backend.as_ref(), "Lapack", &matrix, &rhs)?;
//! if solver.solve() {
//!     println!("{:?} in {:.3e}s", solver.solution(), solver.time());
//! }
//! ```

pub mod backend;
pub mod config;
pub mod direct;
pub mod error;
pub mod linear_solver;
pub mod system;

pub use backend::{
    default_backend, CholeskyEngine, DirectEngine, DisabledBackend, EngineBackend, EngineError,
    EngineRegistry, LapackEngine,
};
pub use config::DirectSolverConfig;
pub use direct::{is_available, DirectScalar, DirectSolver};
pub use error::{FactorizationPhase, Result, SolverError};
pub use linear_solver::{FactorizationScheme, LinearSolver};
pub use nalgebra::Complex;
pub use system::{SparseTriplets, SystemMatrix, SystemVector};
