//! Direct solver backend abstraction layer.
//!
//! This module provides the trait-based interface between the
//! `DirectSolver` adapter and concrete factorization engines. Engines are
//! selected by name at runtime through an `EngineBackend`.
//!
//! # Backends
//!
//! - **EngineRegistry** (default, `--features direct`): explicit
//!   name → factory map. Ships with:
//!   - `Lapack`: dense LU via nalgebra, any non-singular operator.
//!   - `Cholesky`: sparse Cholesky via nalgebra-sparse, SPD operators.
//! - **DisabledBackend**: stand-in that reports no capability at all.
//!
//! # Architecture
//!
//! ```text
//! Assembly (COO triplets + rhs vector)
//!         │
//!         ▼
//! DirectSolver (LinearSolver contract)
//!         │
//!         ▼
//! EngineBackend ── create(name) ──► Box<dyn DirectEngine>
//!    ┌────┴─────┐                     ┌────┴────┐
//!    ▼          ▼                     ▼         ▼
//! Registry   Disabled              Lapack   Cholesky
//! ```

pub mod cholesky;
pub mod disabled;
pub mod lapack;
pub mod registry;
pub mod traits;

pub use cholesky::CholeskyEngine;
pub use disabled::DisabledBackend;
pub use lapack::LapackEngine;
pub use registry::EngineRegistry;
pub use traits::*;

/// Returns the default engine backend based on enabled features.
///
/// With `--features direct` (the default): the built-in `EngineRegistry`.
/// Without: the `DisabledBackend`.
pub fn default_backend() -> Box<dyn EngineBackend> {
    if cfg!(feature = "direct") {
        Box::new(EngineRegistry::with_builtin_engines())
    } else {
        Box::new(DisabledBackend)
    }
}
