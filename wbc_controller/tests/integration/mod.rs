//! Shared fixtures for the integration scenarios.

mod goal_intake;
mod lifecycle_gating;

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use wbc_common::prelude::*;
use wbc_controller::ControlLoop;
use wbc_controller::build_control_loop;
use wbc_controller::transport::LatchedBus;
use wbc_solver::SolverRegistry;

// ── Fixture config ──────────────────────────────────────────────────

pub const FRAME: &str = "base_link";
pub const LEFT: &str = "l_elbow_flex_joint";
pub const RIGHT: &str = "r_elbow_flex_joint";
pub const LEFT_CHANNEL: &str = "/l_elbow_flex_velocity_controller/command";
pub const RIGHT_CHANNEL: &str = "/r_elbow_flex_velocity_controller/command";

/// Two joints; each tracks the x coordinate of its arm's goal.
/// State layout: q0 q1 | left x y z ez ey ex | right x y z ez ey ex.
pub const CONTROLLER_TOML: &str = r#"
iterations = 10
frame_id = "base_link"
joint_names = ["l_elbow_flex_joint", "r_elbow_flex_joint"]

[solver]
kind = "proportional"

[[solver.controllables]]
name = "l_elbow_flex_joint"
state_index = 0
target_index = 2
max_velocity = 0.5

[[solver.controllables]]
name = "r_elbow_flex_joint"
state_index = 1
target_index = 8
"#;

pub fn config() -> ValidatedConfig {
    controller_config_from_str(CONTROLLER_TOML, Path::new(".")).expect("fixture config")
}

/// Control loop around the proportional solver, publishing to a latched bus.
pub fn proportional_loop() -> ControlLoop<Box<dyn Solver>, LatchedBus> {
    build_control_loop(&config(), &SolverRegistry::with_builtin(), LatchedBus::new())
        .expect("fixture control loop")
}

// ── Messages ────────────────────────────────────────────────────────

pub fn framed(frame: &str, x: f64, y: f64, z: f64, orientation: Quaternion) -> FramedPose {
    FramedPose::new(
        frame,
        Pose {
            position: Point::new(x, y, z),
            orientation,
        },
    )
}

/// Goal with identity orientations; only the x coordinates vary.
pub fn goal(left_x: f64, right_x: f64) -> WholeBodyGoal {
    WholeBodyGoal {
        left_ee_goal: framed(FRAME, left_x, 0.0, 0.0, Quaternion::IDENTITY),
        right_ee_goal: framed(FRAME, right_x, 0.0, 0.0, Quaternion::IDENTITY),
    }
}

pub fn joint_state(pairs: &[(&str, f64)]) -> JointState {
    pairs.iter().copied().collect()
}

// ── Scripted solver ─────────────────────────────────────────────────

/// Knobs and counters shared between a test and its [`ScriptedSolver`].
#[derive(Debug, Default)]
pub struct Script {
    pub fail_start: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub starts: Cell<u32>,
    pub updates: Cell<u32>,
}

/// Solver whose outcomes are set by the test. On success the command echoes
/// the leading state entries and the single slack counts updates.
#[derive(Debug)]
pub struct ScriptedSolver {
    script: Rc<Script>,
    names: Vec<String>,
    soft: Vec<String>,
    command: Vec<f64>,
    slack: Vec<f64>,
}

impl ScriptedSolver {
    pub fn new(controllables: &[&str]) -> (Self, Rc<Script>) {
        let script = Rc::new(Script::default());
        let solver = Self {
            script: Rc::clone(&script),
            names: controllables.iter().map(|n| n.to_string()).collect(),
            soft: vec!["posture".to_string()],
            command: vec![0.0; controllables.len()],
            slack: vec![0.0],
        };
        (solver, script)
    }

    fn solve(&mut self, state: &[f64]) {
        for (cmd, &q) in self.command.iter_mut().zip(state) {
            *cmd = q;
        }
        self.slack[0] = f64::from(self.script.updates.get());
    }
}

impl Solver for ScriptedSolver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn start(&mut self, state: &[f64], _iterations: u32) -> Result<(), SolverError> {
        self.script.starts.set(self.script.starts.get() + 1);
        if self.script.fail_start.get() {
            return Err(SolverError::Infeasible("scripted start failure".into()));
        }
        self.solve(state);
        Ok(())
    }

    fn update(&mut self, state: &[f64], _iterations: u32) -> Result<(), SolverError> {
        if self.script.fail_update.get() {
            return Err(SolverError::Infeasible("scripted update failure".into()));
        }
        self.script.updates.set(self.script.updates.get() + 1);
        self.solve(state);
        Ok(())
    }

    fn command(&self) -> &[f64] {
        &self.command
    }

    fn slack(&self) -> &[f64] {
        &self.slack
    }

    fn controllable_names(&self) -> &[String] {
        &self.names
    }

    fn soft_constraint_names(&self) -> &[String] {
        &self.soft
    }
}

/// Control loop around a [`ScriptedSolver`] for the fixture joints.
pub fn scripted_loop() -> (ControlLoop<ScriptedSolver, LatchedBus>, Rc<Script>) {
    let (solver, script) = ScriptedSolver::new(&[LEFT, RIGHT]);
    let control = ControlLoop::new(&config(), solver, LatchedBus::new())
        .unwrap_or_else(|e| panic!("fixture control loop: {e}"));
    (control, script)
}
