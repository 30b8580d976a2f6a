//! Prelude module for common re-exports.
//!
//! ```rust
//! use wbc_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ConfigError, ConfigLoader, ValidatedConfig, controller_config_from_str, load_controller_config,
};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{CURRENT_GOAL_CHANNEL, FEEDBACK_CHANNEL, GOAL_SLOTS, POSE_SLOTS};

// ─── Messages ───────────────────────────────────────────────────────
pub use crate::messages::{
    ControllerFeedback, FramedPose, JointCommand, JointState, Point, Pose, Quaternion,
    SemanticValue, WholeBodyGoal,
};

// ─── Solver ─────────────────────────────────────────────────────────
pub use crate::solver::{Solver, SolverError, SolverFactory, SolverSpec};
