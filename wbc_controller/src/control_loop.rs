//! The control-loop context.
//!
//! One owned value holds every piece of mutable state (state vector, goal
//! fingerprint, run-state, feedback record) and exposes the two entry points
//! the event dispatcher calls: [`ControlLoop::on_joint_state`] and
//! [`ControlLoop::on_goal`]. Callbacks run to completion one at a time, so
//! nothing here is locked.

use thiserror::Error;
use tracing::{debug, info, warn};
use wbc_common::config::{ConfigError, ValidatedConfig};
use wbc_common::consts::STATS_LOG_INTERVAL;
use wbc_common::messages::{JointState, WholeBodyGoal};
use wbc_common::solver::{Solver, SolverError};
use wbc_solver::SolverRegistry;

use crate::dispatch::CommandDispatcher;
use crate::goal::{GoalIntake, GoalOutcome};
use crate::joint_state::JointStateBuffer;
use crate::lifecycle::{ControllerLifecycle, RunState};
use crate::state::StateVector;
use crate::stats::ControllerStats;
use crate::transport::{InboundEvent, OutputSink};

/// Failures that prevent the loop from being built. All are fatal.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to generate solver: {0}")]
    Solver(#[from] SolverError),

    /// Every tracked joint needs a command index.
    #[error("solver exposes {controllables} controllables but {joints} joints are tracked")]
    ChannelCountMismatch { joints: usize, controllables: usize },
}

/// Single-owner control-loop context.
pub struct ControlLoop<S: Solver, O: OutputSink> {
    joints: JointStateBuffer,
    goals: GoalIntake,
    lifecycle: ControllerLifecycle<S>,
    dispatcher: CommandDispatcher,
    state: StateVector,
    sink: O,
    stats: ControllerStats,
}

impl<S: Solver, O: OutputSink> ControlLoop<S, O> {
    /// Wire the components together. The solver is not started yet.
    ///
    /// # Errors
    /// `StartupError::ChannelCountMismatch` if the solver has fewer
    /// controllables than there are tracked joints.
    pub fn new(config: &ValidatedConfig, solver: S, sink: O) -> Result<Self, StartupError> {
        let joints = config.joint_names.len();
        let controllables = solver.controllable_names().len();
        if controllables < joints {
            return Err(StartupError::ChannelCountMismatch {
                joints,
                controllables,
            });
        }

        let dispatcher = CommandDispatcher::new(
            &config.joint_names,
            &config.joint_suffix,
            solver.controllable_names(),
            solver.soft_constraint_names(),
        );
        debug!("Command channels: {:?}", dispatcher.channels());

        Ok(Self {
            joints: JointStateBuffer::new(config.joint_names.clone()),
            goals: GoalIntake::new(config.frame_id.clone()),
            lifecycle: ControllerLifecycle::new(solver, config.iterations),
            dispatcher,
            state: StateVector::new(joints),
            sink,
            stats: ControllerStats::default(),
        })
    }

    /// Route one inbound event to its callback.
    pub fn handle(&mut self, event: &InboundEvent) {
        match event {
            InboundEvent::JointState(msg) => self.on_joint_state(msg),
            InboundEvent::Goal(goal) => self.on_goal(goal),
        }
    }

    /// Joint-state callback: sync the state vector, then tick if running.
    pub fn on_joint_state(&mut self, msg: &JointState) {
        self.stats.joint_state_messages += 1;
        self.joints.apply(&mut self.state, msg);

        if !self.lifecycle.is_running() {
            return;
        }

        let solution = match self.lifecycle.tick(&self.state) {
            Ok(solution) => solution,
            Err(_) => {
                self.stats.failed_updates += 1;
                return;
            }
        };

        if let Err(e) = self
            .dispatcher
            .dispatch(&mut self.sink, solution.command, solution.slack)
        {
            warn!("Failed to publish commands: {e}");
            self.stats.dispatch_failures += 1;
        }
        self.stats.ticks += 1;

        if self.stats.ticks % STATS_LOG_INTERVAL == 0 {
            debug!("Control loop: {}", self.stats);
        }
    }

    /// Goal callback: dedupe, validate, project, echo, and start if stopped.
    pub fn on_goal(&mut self, goal: &WholeBodyGoal) {
        match self.goals.submit(&mut self.state, goal) {
            GoalOutcome::Duplicate => {
                self.stats.goals_duplicate += 1;
                return;
            }
            GoalOutcome::Rejected(_) => {
                self.stats.goals_rejected += 1;
                return;
            }
            GoalOutcome::Accepted => self.stats.goals_accepted += 1,
        }

        if let Err(e) = self.sink.publish_goal(goal) {
            warn!("Failed to publish current goal: {e}");
        }

        if self.lifecycle.is_running() {
            return;
        }

        let missing = self.joints.never_observed();
        if !missing.is_empty() {
            warn!(
                "Starting controller before joint states arrived for: {}",
                missing.join(", ")
            );
        }
        self.stats.start_attempts += 1;
        // Failure is logged by the lifecycle; the next accepted goal retries.
        let _ = self.lifecycle.start(&self.state);
    }

    #[inline]
    pub fn run_state(&self) -> RunState {
        self.lifecycle.run_state()
    }

    #[inline]
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    #[inline]
    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    #[inline]
    pub fn solver(&self) -> &S {
        self.lifecycle.solver()
    }

    #[inline]
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Per-joint command channels, in joint order.
    pub fn command_channels(&self) -> &[String] {
        self.dispatcher.channels()
    }

    pub fn into_sink(self) -> O {
        self.sink
    }
}

/// Generate the solver named by the configuration and build the loop around it.
pub fn build_control_loop<O: OutputSink>(
    config: &ValidatedConfig,
    registry: &SolverRegistry,
    sink: O,
) -> Result<ControlLoop<Box<dyn Solver>, O>, StartupError> {
    let solver = registry.generate(&config.solver)?;
    let control = ControlLoop::new(config, solver, sink)?;
    info!(
        "Control loop ready: {} joints, frame '{}', {} iterations per solve",
        config.joint_names.len(),
        config.frame_id,
        config.iterations
    );
    Ok(control)
}
