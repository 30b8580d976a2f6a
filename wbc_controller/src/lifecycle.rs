//! Controller run-state and solver driving.
//!
//! `Stopped → Running` on the first successful solver start; there is no way
//! back. While stopped, only `start()` may reach the solver; while running,
//! only `tick()`.

use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use wbc_common::solver::{Solver, SolverError};

use crate::state::StateVector;

/// Controller run-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Initial state; waiting for a goal the solver can start from.
    #[default]
    Stopped,
    /// Solver started; every joint-state message produces a tick.
    Running,
}

/// Lifecycle operation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// `tick()` while stopped.
    #[error("controller is not running")]
    NotRunning,

    /// `start()` while already running.
    #[error("controller is already running")]
    AlreadyRunning,

    /// The solver refused the call.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Raw outputs of one successful tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution<'a> {
    /// One entry per controllable.
    pub command: &'a [f64],
    /// One entry per soft constraint.
    pub slack: &'a [f64],
}

/// Owns the solver and the run-state.
#[derive(Debug)]
pub struct ControllerLifecycle<S> {
    solver: S,
    iterations: u32,
    state: RunState,
}

impl<S: Solver> ControllerLifecycle<S> {
    /// Wrap a solver. `iterations` is passed to every start/update call.
    pub fn new(solver: S, iterations: u32) -> Self {
        Self {
            solver,
            iterations,
            state: RunState::Stopped,
        }
    }

    #[inline]
    pub fn run_state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Try to start the solver from `state`.
    ///
    /// On failure the run-state stays `Stopped` and the full state vector is
    /// dumped; the next accepted goal retries.
    pub fn start(&mut self, state: &StateVector) -> Result<(), LifecycleError> {
        if self.is_running() {
            return Err(LifecycleError::AlreadyRunning);
        }
        match self.solver.start(state.as_slice(), self.iterations) {
            Ok(()) => {
                self.state = RunState::Running;
                info!("Controller started ({} solver)", self.solver.name());
                Ok(())
            }
            Err(e) => {
                error!("Couldn't start controller: {e}");
                debug!("Start failed. State: {state}");
                Err(e.into())
            }
        }
    }

    /// Run one solver update.
    ///
    /// A failed update yields no output and is never fatal; the caller just
    /// waits for the next joint-state message.
    pub fn tick(&mut self, state: &StateVector) -> Result<Solution<'_>, LifecycleError> {
        if !self.is_running() {
            return Err(LifecycleError::NotRunning);
        }
        if let Err(e) = self.solver.update(state.as_slice(), self.iterations) {
            warn!("Update failed: {e}");
            debug!("Update failed. State: {state}");
            return Err(e.into());
        }
        let solution = Solution {
            command: self.solver.command(),
            slack: self.solver.slack(),
        };
        trace!("Command: {:?}", solution.command);
        Ok(solution)
    }
}
