//! # WBC Controller
//!
//! Reactive whole-body control loop. Joint-state messages drive the loop:
//! each one refreshes the joint segment of the state vector and, once a goal
//! has started the solver, triggers one solver update whose command vector is
//! fanned out to per-joint velocity channels. Goal messages carry Cartesian
//! targets for both end effectors; they are deduplicated, checked against the
//! configured frame and projected into the goal segment.
//!
//! ## Modules
//!
//! - [`state`] - state vector layout (joints, then left and right goal poses)
//! - [`joint_state`] - name-to-index joint position sync
//! - [`goal`] - goal dedup, frame validation and projection
//! - [`lifecycle`] - solver start/update gating
//! - [`dispatch`] - command fan-out and feedback
//! - [`transport`] - output sinks and inbound wire format
//! - [`control_loop`] - the single-owner context tying it all together
//! - [`serve`] - line-oriented event loop

pub mod control_loop;
pub mod dispatch;
pub mod goal;
pub mod joint_state;
pub mod lifecycle;
pub mod serve;
pub mod state;
pub mod stats;
pub mod transport;

pub use control_loop::{ControlLoop, StartupError, build_control_loop};
pub use serve::{ServeSummary, serve};
