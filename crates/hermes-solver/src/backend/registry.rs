//! Name-keyed engine registry.
//!
//! The registry is an ordinary value owned by the caller and passed by
//! reference to every adapter it should serve. There is no process-wide
//! factory; two registries never share state.

use std::collections::BTreeMap;
use std::fmt;

use super::cholesky::CholeskyEngine;
use super::lapack::LapackEngine;
use super::traits::*;

type EngineFactory = Box<dyn Fn() -> Box<dyn DirectEngine> + Send + Sync>;

/// Registry of direct solver engines, keyed by exact name.
pub struct EngineRegistry {
    factories: BTreeMap<String, EngineFactory>,
}

impl EngineRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry holding the engines shipped with this crate
    /// (`Lapack` and `Cholesky`).
    pub fn with_builtin_engines() -> Self {
        let mut registry = Self::new();
        registry.register(LapackEngine::NAME, || Box::new(LapackEngine::new()));
        registry.register(CholeskyEngine::NAME, || Box::new(CholeskyEngine::new()));
        registry
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn DirectEngine> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            log::debug!("replaced direct solver engine '{}'", name);
        }
    }

    /// Remove the engine registered under `name`. Returns whether it existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_builtin_engines()
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EngineBackend for EngineRegistry {
    fn is_compiled(&self) -> bool {
        true
    }

    fn query(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn create(&self, name: &str) -> Option<Box<dyn DirectEngine>> {
        self.factories.get(name).map(|factory| factory())
    }

    fn engine_names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}
