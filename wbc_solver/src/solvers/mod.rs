//! Built-in solver implementations.
//!
//! - [`proportional`] - Closed-form per-joint feedback law with soft velocity limits
//!
//! # Adding New Solvers
//!
//! 1. Create a new submodule under `solvers/`
//! 2. Implement the `Solver` trait from `wbc_common::solver`
//! 3. Register its factory in [`register_all_solvers`]

pub mod proportional;

use crate::registry::SolverRegistry;

/// Register all built-in solvers.
pub fn register_all_solvers(registry: &mut SolverRegistry) {
    registry.register(proportional::KIND, proportional::create_solver);
}
