//! # WBC Solver Library
//!
//! Generates [`Solver`](wbc_common::solver::Solver) instances from a
//! [`SolverSpec`](wbc_common::solver::SolverSpec) description.
//!
//! - [`registry`] - `SolverRegistry`, kind → factory
//! - [`solvers`] - Built-in solver implementations

pub mod registry;
pub mod solvers;

pub use crate::registry::SolverRegistry;
