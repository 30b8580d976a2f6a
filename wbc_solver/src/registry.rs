//! Solver registry.
//!
//! Maps a `SolverSpec::kind` to the factory that generates the solver.
//! Constructed at startup and passed by value; no global state.

use std::collections::HashMap;

use tracing::info;
use wbc_common::solver::{Solver, SolverError, SolverFactory, SolverSpec};

use crate::solvers::register_all_solvers;

/// Registry of available solver generators.
pub struct SolverRegistry {
    factories: HashMap<&'static str, SolverFactory>,
}

impl SolverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with every built-in solver.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        register_all_solvers(&mut registry);
        registry
    }

    /// Register a solver factory.
    ///
    /// # Panics
    /// Panics if a solver with the same kind is already registered.
    pub fn register(&mut self, kind: &'static str, factory: SolverFactory) {
        if self.factories.contains_key(kind) {
            panic!("Solver kind '{kind}' is already registered");
        }
        self.factories.insert(kind, factory);
    }

    /// Get a solver factory by kind.
    pub fn get_factory(&self, kind: &str) -> Option<SolverFactory> {
        self.factories.get(kind).copied()
    }

    /// Generate a solver instance from its description.
    ///
    /// # Errors
    /// Returns `SolverError::UnknownKind` if no factory handles `spec.kind`,
    /// or whatever the factory reports for an invalid description.
    pub fn generate(&self, spec: &SolverSpec) -> Result<Box<dyn Solver>, SolverError> {
        let factory = self
            .get_factory(&spec.kind)
            .ok_or_else(|| SolverError::UnknownKind(spec.kind.clone()))?;
        let solver = factory(spec)?;
        info!(
            "Generated solver '{}': {} controllables, {} soft constraints",
            solver.name(),
            solver.controllable_names().len(),
            solver.soft_constraint_names().len()
        );
        Ok(solver)
    }

    /// List all registered solver kinds.
    pub fn list_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.factories.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
