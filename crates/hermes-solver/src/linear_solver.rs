//! The `LinearSolver` contract shared by all solvers of the framework.

use serde::{Deserialize, Serialize};

/// Policy for the next factorization.
///
/// The reuse variants only take effect once the engine has performed at
/// least one factorization; before that every scheme behaves like
/// `FromScratch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorizationScheme {
    /// Symbolic and numeric factorization.
    #[default]
    FromScratch,
    /// Keep the fill-reducing ordering, redo the numeric factorization.
    ReuseReordering,
    /// Keep ordering and scaling, redo the numeric factorization.
    ReuseReorderingAndScaling,
}

impl FactorizationScheme {
    /// Whether this scheme asks to keep a previous symbolic factorization.
    pub fn reuses_reordering(&self) -> bool {
        !matches!(self, FactorizationScheme::FromScratch)
    }
}

/// Uniform interface of the framework's linear solvers.
///
/// A successful `solve` leaves a solution of exactly the system dimension
/// available through `solution`; a failed one leaves the previous solution
/// and timing in place.
pub trait LinearSolver<S> {
    /// Solve the bound system. Returns `true` on success.
    fn solve(&mut self) -> bool;

    /// Solution of the most recent successful solve.
    fn solution(&self) -> Option<&[S]>;

    /// Move the current solution out of the solver.
    fn take_solution(&mut self) -> Option<Vec<S>>;

    /// Wall-clock seconds spent in the most recent successful solve.
    fn time(&self) -> f64;

    fn factorization_scheme(&self) -> FactorizationScheme;

    fn set_factorization_scheme(&mut self, scheme: FactorizationScheme);
}
