//! Proportional reference solver.
//!
//! Drives every controllable toward its setpoint with a closed-form law:
//!
//! ```text
//! raw[i]     = gain[i] · (target[i] − state[state_index[i]])
//! command[i] = clamp(raw[i], ±max_velocity[i])
//! slack[k]   = max(|raw[i]| − max_velocity[i], 0)    for each limited controllable
//! ```
//!
//! The setpoint is either a state-vector slot (`target_index`, e.g. a goal
//! coordinate) or a constant (`target`). Each `max_velocity` adds one soft
//! constraint named `"<controllable>/velocity"`; its slack is how far the
//! unclamped command exceeded the limit.
//!
//! The law needs a single pass, so any non-zero iteration budget suffices.

use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;
use wbc_common::solver::{Solver, SolverError, SolverSpec};

/// Registry key.
pub const KIND: &str = "proportional";

/// Suffix of the soft constraint generated for a velocity limit.
const VELOCITY_CONSTRAINT_SUFFIX: &str = "/velocity";

fn default_gain() -> f64 {
    1.0
}

/// Typed form of a `kind = "proportional"` description.
#[derive(Debug, Clone, Deserialize)]
pub struct ProportionalSpec {
    pub controllables: Vec<ControllableSpec>,
}

/// One controllable degree of freedom.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllableSpec {
    /// Controllable name, reported in the feedback record.
    pub name: String,
    /// State slot holding the measured position.
    pub state_index: usize,
    /// State slot holding the setpoint; overrides `target`.
    #[serde(default)]
    pub target_index: Option<usize>,
    /// Constant setpoint used when `target_index` is absent.
    #[serde(default)]
    pub target: f64,
    /// Proportional gain [1/s].
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Soft velocity limit [unit/s].
    #[serde(default)]
    pub max_velocity: Option<f64>,
}

impl ControllableSpec {
    fn highest_index(&self) -> usize {
        self.target_index.map_or(self.state_index, |t| t.max(self.state_index))
    }
}

/// Factory for the registry.
pub fn create_solver(spec: &SolverSpec) -> Result<Box<dyn Solver>, SolverError> {
    let typed: ProportionalSpec = spec.params()?;
    Ok(Box::new(ProportionalSolver::new(typed)?))
}

/// Closed-form proportional solver.
#[derive(Debug, Clone)]
pub struct ProportionalSolver {
    controllables: Vec<ControllableSpec>,
    controllable_names: Vec<String>,
    soft_constraint_names: Vec<String>,
    /// `(controllable index, max_velocity)` per soft constraint, in slack order.
    limits: Vec<(usize, f64)>,
    /// Minimum state length covering every referenced slot.
    required_len: usize,
    command: Vec<f64>,
    slack: Vec<f64>,
    started: bool,
}

impl ProportionalSolver {
    /// Build a solver from its typed description.
    ///
    /// # Errors
    /// `SolverError::InvalidSpec` for an empty controllable list, duplicate
    /// names, a non-finite gain/target, or a non-positive velocity limit.
    pub fn new(spec: ProportionalSpec) -> Result<Self, SolverError> {
        if spec.controllables.is_empty() {
            return Err(SolverError::InvalidSpec(
                "at least one controllable is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut limits = Vec::new();
        let mut soft_constraint_names = Vec::new();
        for (idx, c) in spec.controllables.iter().enumerate() {
            if !seen.insert(c.name.as_str()) {
                return Err(SolverError::InvalidSpec(format!(
                    "duplicate controllable '{}'",
                    c.name
                )));
            }
            if !c.gain.is_finite() || !c.target.is_finite() {
                return Err(SolverError::InvalidSpec(format!(
                    "controllable '{}': gain and target must be finite",
                    c.name
                )));
            }
            if let Some(max) = c.max_velocity {
                if !(max.is_finite() && max > 0.0) {
                    return Err(SolverError::InvalidSpec(format!(
                        "controllable '{}': max_velocity must be positive, got {max}",
                        c.name
                    )));
                }
                limits.push((idx, max));
                soft_constraint_names.push(format!("{}{VELOCITY_CONSTRAINT_SUFFIX}", c.name));
            }
        }

        let required_len = spec
            .controllables
            .iter()
            .map(ControllableSpec::highest_index)
            .max()
            .map_or(0, |i| i + 1);

        Ok(Self {
            controllable_names: spec.controllables.iter().map(|c| c.name.clone()).collect(),
            command: vec![0.0; spec.controllables.len()],
            slack: vec![0.0; limits.len()],
            controllables: spec.controllables,
            soft_constraint_names,
            limits,
            required_len,
            started: false,
        })
    }

    /// Minimum state-vector length this solver accepts.
    pub fn required_state_len(&self) -> usize {
        self.required_len
    }

    /// Check every referenced slot before touching the outputs, so a failed
    /// solve leaves the previous command and slack intact.
    fn check_state(&self, state: &[f64], iterations: u32) -> Result<(), SolverError> {
        if iterations == 0 {
            return Err(SolverError::IterationBudgetExhausted(iterations));
        }
        if state.len() < self.required_len {
            return Err(SolverError::StateLength {
                expected: self.required_len,
                actual: state.len(),
            });
        }
        for c in &self.controllables {
            for idx in std::iter::once(c.state_index).chain(c.target_index) {
                if !state[idx].is_finite() {
                    return Err(SolverError::NonFiniteState(idx));
                }
            }
        }
        Ok(())
    }

    fn solve(&mut self, state: &[f64], iterations: u32) -> Result<(), SolverError> {
        self.check_state(state, iterations)?;

        for (cmd, c) in self.command.iter_mut().zip(&self.controllables) {
            let target = c.target_index.map_or(c.target, |t| state[t]);
            *cmd = c.gain * (target - state[c.state_index]);
        }

        for (slack, &(idx, max)) in self.slack.iter_mut().zip(&self.limits) {
            let raw = self.command[idx];
            *slack = (raw.abs() - max).max(0.0);
            self.command[idx] = raw.clamp(-max, max);
        }
        Ok(())
    }
}

impl Solver for ProportionalSolver {
    fn name(&self) -> &'static str {
        KIND
    }

    fn start(&mut self, state: &[f64], iterations: u32) -> Result<(), SolverError> {
        self.solve(state, iterations)?;
        self.started = true;
        debug!("Proportional solver started with {} state entries", state.len());
        Ok(())
    }

    fn update(&mut self, state: &[f64], iterations: u32) -> Result<(), SolverError> {
        if !self.started {
            return Err(SolverError::NotStarted);
        }
        self.solve(state, iterations)
    }

    fn command(&self) -> &[f64] {
        &self.command
    }

    fn slack(&self) -> &[f64] {
        &self.slack
    }

    fn controllable_names(&self) -> &[String] {
        &self.controllable_names
    }

    fn soft_constraint_names(&self) -> &[String] {
        &self.soft_constraint_names
    }
}
