//! Wire message types exchanged with the transport.
//!
//! Plain serde structs mirroring the inbound streams (joint states, goals)
//! and the outbound channels (per-joint command, feedback, goal echo).

use serde::{Deserialize, Serialize};

// ─── Geometry primitives ────────────────────────────────────────────

/// Cartesian position [m].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Orientation as a (not necessarily normalized) quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    /// No rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Position + orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

/// A pose qualified by the reference frame it is expressed in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FramedPose {
    pub frame_id: String,
    pub pose: Pose,
}

impl FramedPose {
    pub fn new(frame_id: impl Into<String>, pose: Pose) -> Self {
        Self {
            frame_id: frame_id.into(),
            pose,
        }
    }
}

// ─── Inbound ────────────────────────────────────────────────────────

/// Cartesian goal for both end-effectors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WholeBodyGoal {
    pub left_ee_goal: FramedPose,
    pub right_ee_goal: FramedPose,
}

/// Observed joint positions. `name[i]` pairs with `position[i]`;
/// any subset of joints may be present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JointState {
    pub name: Vec<String>,
    pub position: Vec<f64>,
}

impl JointState {
    /// Iterate `(name, position)` pairs. Names without a position are skipped.
    pub fn observations(&self) -> impl Iterator<Item = (&str, f64)> {
        self.name
            .iter()
            .map(String::as_str)
            .zip(self.position.iter().copied())
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for JointState {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let (name, position) = iter.into_iter().map(|(n, p)| (n.into(), p)).unzip();
        Self { name, position }
    }
}

// ─── Outbound ───────────────────────────────────────────────────────

/// Scalar velocity command for one joint channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointCommand {
    pub data: f64,
}

/// Named scalar inside the feedback record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticValue {
    pub semantics: String,
    pub value: f64,
}

/// Aggregated per-tick feedback: one entry per controllable and one per
/// soft constraint. Names are fixed at startup; values change every tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerFeedback {
    pub commands: Vec<SemanticValue>,
    pub slacks: Vec<SemanticValue>,
}

impl ControllerFeedback {
    /// Build a feedback record with the given names and all values zeroed.
    pub fn with_names<C, S>(commands: C, slacks: S) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let named = |name: String| SemanticValue {
            semantics: name,
            value: 0.0,
        };
        Self {
            commands: commands.into_iter().map(Into::into).map(named).collect(),
            slacks: slacks.into_iter().map(Into::into).map(named).collect(),
        }
    }
}
