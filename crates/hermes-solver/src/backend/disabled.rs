//! Stand-in backend for builds without direct solver support.
//!
//! Every capability query answers `false` and no engine can be created,
//! so constructing a `DirectSolver` against it fails with
//! `SolverError::BackendNotCompiled`.

use super::traits::*;

/// Backend used when the `direct` feature is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBackend;

impl EngineBackend for DisabledBackend {
    fn is_compiled(&self) -> bool {
        false
    }

    fn query(&self, _name: &str) -> bool {
        false
    }

    fn create(&self, name: &str) -> Option<Box<dyn DirectEngine>> {
        log::debug!("direct solver engine '{}' requested from disabled backend", name);
        None
    }

    fn engine_names(&self) -> Vec<String> {
        Vec::new()
    }
}
