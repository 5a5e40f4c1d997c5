//! Direct solver adapter.
//!
//! `DirectSolver` binds a borrowed system (operator + right-hand side) to
//! one factorization engine created by name, drives the engine through
//! symbolic factorization, numeric factorization and solve, and keeps the
//! solution and timing of the last successful solve.
//!
//! Failures never touch the previous solution or timing. Factorization
//! failures are logged as warnings, everything else as errors.

use std::fmt;
use std::time::Instant;

use nalgebra::{Complex, ComplexField, DVector};

use crate::backend::{DirectEngine, EngineBackend};
use crate::config::DirectSolverConfig;
use crate::error::{FactorizationPhase, Result, SolverError};
use crate::linear_solver::{FactorizationScheme, LinearSolver};
use crate::system::{SystemMatrix, SystemVector};

/// Scalar types a `DirectSolver` can be instantiated for.
pub trait DirectScalar: ComplexField + Copy {
    /// Run one full solve on `solver`.
    fn solve_direct(solver: &mut DirectSolver<'_, Self>) -> Result<()>;
}

impl DirectScalar for f64 {
    fn solve_direct(solver: &mut DirectSolver<'_, Self>) -> Result<()> {
        solver.solve_real()
    }
}

impl DirectScalar for Complex<f64> {
    /// Complex-valued systems are not supported by the engines yet; this
    /// fails before any engine work is done.
    fn solve_direct(solver: &mut DirectSolver<'_, Self>) -> Result<()> {
        solver.check_binding();
        Err(SolverError::NotImplemented(
            "DirectSolver::solve() for complex problems",
        ))
    }
}

/// Whether `backend` can create an engine named `name`.
///
/// Has no side effects and is always `false` for a backend that is not
/// compiled in.
pub fn is_available(backend: &dyn EngineBackend, name: &str) -> bool {
    backend.is_compiled() && backend.query(name)
}

/// Direct solver over a borrowed sparse system.
pub struct DirectSolver<'a, S: ComplexField> {
    engine: Box<dyn DirectEngine>,
    matrix: &'a SystemMatrix<S>,
    rhs: &'a SystemVector<S>,
    factorization_scheme: FactorizationScheme,
    sln: Option<Vec<S>>,
    time: f64,
}

impl<'a, S: ComplexField> DirectSolver<'a, S> {
    /// Create a solver using the engine registered as `solver_type`.
    ///
    /// Fails with `SolverError::BackendNotCompiled` for a disabled backend
    /// and with `SolverError::UnknownEngine` when no engine has that name.
    pub fn new(
        backend: &dyn EngineBackend,
        solver_type: &str,
        matrix: &'a SystemMatrix<S>,
        rhs: &'a SystemVector<S>,
    ) -> Result<Self> {
        if !backend.is_compiled() {
            return Err(SolverError::BackendNotCompiled);
        }
        let engine = backend
            .create(solver_type)
            .ok_or_else(|| SolverError::UnknownEngine(solver_type.to_string()))?;
        log::debug!("DirectSolver: created engine '{}'", engine.name());

        Ok(Self {
            engine,
            matrix,
            rhs,
            factorization_scheme: FactorizationScheme::FromScratch,
            sln: None,
            time: 0.0,
        })
    }

    /// Create a solver from a configuration: engine name, factorization
    /// scheme and transpose flag.
    pub fn from_config(
        backend: &dyn EngineBackend,
        config: &DirectSolverConfig,
        matrix: &'a SystemMatrix<S>,
        rhs: &'a SystemVector<S>,
    ) -> Result<Self> {
        let mut solver = Self::new(backend, &config.engine, matrix, rhs)?;
        solver.factorization_scheme = config.factorization_scheme;
        solver.set_use_transpose(config.use_transpose);
        Ok(solver)
    }

    /// Bind a new system. Engine, factorization counters, scheme, solution
    /// and timing are kept.
    pub fn set_system(&mut self, matrix: &'a SystemMatrix<S>, rhs: &'a SystemVector<S>) {
        self.matrix = matrix;
        self.rhs = rhs;
    }

    pub fn matrix(&self) -> &'a SystemMatrix<S> {
        self.matrix
    }

    pub fn rhs(&self) -> &'a SystemVector<S> {
        self.rhs
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn set_use_transpose(&mut self, use_transpose: bool) {
        self.engine.set_use_transpose(use_transpose);
    }

    pub fn use_transpose(&self) -> bool {
        self.engine.use_transpose()
    }

    pub fn num_symbolic_fact(&self) -> usize {
        self.engine.num_symbolic_fact()
    }

    pub fn num_numeric_fact(&self) -> usize {
        self.engine.num_numeric_fact()
    }

    /// The scheme the next factorization will actually use.
    ///
    /// Reuse is only honoured once the engine has factored something;
    /// until then every scheme means `FromScratch`.
    pub fn effective_scheme(&self) -> FactorizationScheme {
        if self.factorization_scheme.reuses_reordering()
            && self.engine.num_symbolic_fact() == 0
            && self.engine.num_numeric_fact() == 0
        {
            FactorizationScheme::FromScratch
        } else {
            self.factorization_scheme
        }
    }

    /// Solve and report failures as a typed error instead of a flag.
    pub fn try_solve(&mut self) -> Result<()>
    where
        S: DirectScalar,
    {
        S::solve_direct(self)
    }

    fn check_binding(&self) {
        assert_eq!(
            self.matrix.nrows(),
            self.rhs.len(),
            "DirectSolver: matrix rows and rhs length differ"
        );
        assert_eq!(
            self.matrix.ncols(),
            self.rhs.len(),
            "DirectSolver: matrix columns and rhs length differ"
        );
    }
}

impl DirectSolver<'_, f64> {
    /// Bring the engine to a usable numeric factorization of the bound
    /// operator, according to the effective factorization scheme.
    pub fn setup_factorization(&mut self) -> Result<()> {
        let scheme = self.effective_scheme();
        self.ensure_symbolic_if_needed(scheme)?;
        self.run_numeric()
    }

    /// `FromScratch` needs a symbolic factorization first; the reuse
    /// schemes keep the existing one.
    fn ensure_symbolic_if_needed(&mut self, scheme: FactorizationScheme) -> Result<()> {
        if scheme.reuses_reordering() {
            return Ok(());
        }
        log::debug!("Factorizing symbolically.");
        self.engine
            .symbolic_factorization(self.matrix.csr())
            .map_err(|source| {
                log::warn!("Symbolic factorization failed: {}", source);
                SolverError::Factorization {
                    phase: FactorizationPhase::Symbolic,
                    source,
                }
            })
    }

    fn run_numeric(&mut self) -> Result<()> {
        self.engine
            .numeric_factorization(self.matrix.csr())
            .map_err(|source| {
                log::warn!("Numeric factorization failed: {}", source);
                SolverError::Factorization {
                    phase: FactorizationPhase::Numeric,
                    source,
                }
            })
    }

    fn solve_real(&mut self) -> Result<()> {
        self.check_binding();

        let n = self.matrix.size();
        let mut x = DVector::zeros(n);

        let timer = Instant::now();
        self.setup_factorization()?;
        self.engine
            .solve(self.rhs.as_dvector(), &mut x)
            .map_err(SolverError::Solve)?;

        self.time = timer.elapsed().as_secs_f64();

        // Copy the solution into a fresh buffer
        let mut sln = vec![0.0; n];
        for (dst, src) in sln.iter_mut().zip(x.iter()) {
            *dst = *src;
        }
        self.sln = Some(sln);

        Ok(())
    }
}

impl<S: DirectScalar> LinearSolver<S> for DirectSolver<'_, S> {
    fn solve(&mut self) -> bool {
        match self.try_solve() {
            Ok(()) => true,
            Err(err) if err.is_factorization_failure() => {
                log::warn!("DirectSolver: LU factorization could not be completed ({})", err);
                false
            }
            Err(err) => {
                log::error!("DirectSolver: {}", err);
                false
            }
        }
    }

    fn solution(&self) -> Option<&[S]> {
        self.sln.as_deref()
    }

    fn take_solution(&mut self) -> Option<Vec<S>> {
        self.sln.take()
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn factorization_scheme(&self) -> FactorizationScheme {
        self.factorization_scheme
    }

    fn set_factorization_scheme(&mut self, scheme: FactorizationScheme) {
        self.factorization_scheme = scheme;
    }
}

impl<S: ComplexField> fmt::Debug for DirectSolver<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectSolver")
            .field("engine", &self.engine.name())
            .field("size", &self.matrix.size())
            .field("factorization_scheme", &self.factorization_scheme)
            .field("has_solution", &self.sln.is_some())
            .field("time", &self.time)
            .finish()
    }
}
