//! WBC Common Library
//!
//! Shared building blocks for the whole-body controller workspace.
//!
//! # Module Structure
//!
//! - [`messages`] - Wire message types (joint states, goals, feedback)
//! - [`geometry`] - Quaternion ↔ Euler-ZYX encoding for the state vector
//! - [`fingerprint`] - Content digest used for goal deduplication
//! - [`solver`] - `Solver` capability trait, `SolverSpec`, `SolverError`
//! - [`config`] - Controller configuration loading and validation
//! - [`consts`] - State-vector layout and defaults
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod consts;
pub mod fingerprint;
pub mod geometry;
pub mod messages;
pub mod prelude;
pub mod solver;
