//! Solver capability trait and error types.
//!
//! This module defines:
//! - `Solver` trait - Interface the control loop drives every tick
//! - `SolverError` enum - Error types for solver operations
//! - `SolverSpec` struct - The structured description a solver is generated from
//! - `SolverFactory` type alias - Factory function type

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for solver operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The solver description is malformed or inconsistent.
    #[error("Invalid solver description: {0}")]
    InvalidSpec(String),

    /// No factory is registered for the requested kind.
    #[error("Unknown solver kind: {0}")]
    UnknownKind(String),

    /// The state vector is shorter than the description requires.
    #[error("State vector too short: need at least {expected} entries, got {actual}")]
    StateLength { expected: usize, actual: usize },

    /// A referenced state entry is NaN or infinite.
    #[error("Non-finite state entry at index {0}")]
    NonFiniteState(usize),

    /// The iteration budget ran out before a solution was found.
    #[error("Iteration budget of {0} exhausted")]
    IterationBudgetExhausted(u32),

    /// `update()` was called before a successful `start()`.
    #[error("Solver has not been started")]
    NotStarted,

    /// No feasible solution for the current state.
    #[error("Infeasible problem: {0}")]
    Infeasible(String),
}

/// Structured solver description.
///
/// `kind` selects the generator; every other key is kept verbatim and handed
/// to that generator.
///
/// # TOML Example
///
/// ```toml
/// [solver]
/// kind = "proportional"
///
/// [[solver.controllables]]
/// name = "l_elbow_flex_joint"
/// state_index = 0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSpec {
    /// Generator identifier (e.g. "proportional").
    pub kind: String,

    /// Kind-specific parameters.
    #[serde(flatten)]
    pub params: toml::Table,
}

impl SolverSpec {
    pub fn new(kind: impl Into<String>, params: toml::Table) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }

    /// Deserialize the kind-specific parameters into a typed description.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T, SolverError> {
        toml::Value::Table(self.params.clone())
            .try_into()
            .map_err(|e: toml::de::Error| SolverError::InvalidSpec(e.to_string()))
    }
}

/// Factory function type for generating solver instances from a description.
pub type SolverFactory = fn(&SolverSpec) -> Result<Box<dyn Solver>, SolverError>;

/// Interface between the control loop and a numerical solver.
///
/// The control loop treats the solver as opaque: it hands over the whole
/// state vector and reads back one command per controllable and one slack
/// per soft constraint.
///
/// # Lifecycle
///
/// 1. `start()` - Called until it succeeds, once per accepted goal
/// 2. `update()` - Called once per joint-state message after a successful start
///
/// Both calls receive the same iteration budget, which caps work per call.
///
/// # Output Contract
///
/// After a successful `start()` or `update()`:
/// - `command().len() == controllable_names().len()`
/// - `slack().len() == soft_constraint_names().len()`
pub trait Solver {
    /// Returns the solver's identifier (e.g. "proportional").
    fn name(&self) -> &'static str;

    /// Initialize the solver from a full state vector.
    ///
    /// # Errors
    /// Any `SolverError`; the caller stays stopped and retries later.
    fn start(&mut self, state: &[f64], iterations: u32) -> Result<(), SolverError>;

    /// Solve for the current state vector.
    ///
    /// # Errors
    /// Any `SolverError`; the caller skips this cycle.
    fn update(&mut self, state: &[f64], iterations: u32) -> Result<(), SolverError>;

    /// Command vector of the last successful solve.
    fn command(&self) -> &[f64];

    /// Slack vector of the last successful solve.
    fn slack(&self) -> &[f64];

    /// Names of the controllable degrees of freedom, in command order.
    fn controllable_names(&self) -> &[String];

    /// Names of the soft constraints, in slack order.
    fn soft_constraint_names(&self) -> &[String];
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn start(&mut self, state: &[f64], iterations: u32) -> Result<(), SolverError> {
        (**self).start(state, iterations)
    }

    fn update(&mut self, state: &[f64], iterations: u32) -> Result<(), SolverError> {
        (**self).update(state, iterations)
    }

    fn command(&self) -> &[f64] {
        (**self).command()
    }

    fn slack(&self) -> &[f64] {
        (**self).slack()
    }

    fn controllable_names(&self) -> &[String] {
        (**self).controllable_names()
    }

    fn soft_constraint_names(&self) -> &[String] {
        (**self).soft_constraint_names()
    }
}
