//! Flat state vector shared by joint-state sync, goal intake, and the solver.
//!
//! Layout for `J` tracked joints:
//!
//! | Slots           | Content                                   |
//! |-----------------|-------------------------------------------|
//! | `[0, J)`        | joint positions, in joint-name order       |
//! | `[J, J+6)`      | left goal: x, y, z, Euler-ZYX (z, y, x)    |
//! | `[J+6, J+12)`   | right goal, same encoding                 |

use std::fmt;

use wbc_common::consts::{GOAL_SLOTS, POSE_SLOTS};

/// End-effector a goal pose belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    /// Offset of this arm's pose within the goal segment.
    #[inline]
    const fn goal_offset(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => POSE_SLOTS,
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Fixed-length state vector, zero-initialized.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    data: Vec<f64>,
    joint_count: usize,
}

impl StateVector {
    /// Allocate `joint_count + 12` zeroed slots.
    pub fn new(joint_count: usize) -> Self {
        Self {
            data: vec![0.0; joint_count + GOAL_SLOTS],
            joint_count,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    /// Whole vector, as handed to the solver.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Joint position slots `[0, J)`.
    #[inline]
    pub fn joints(&self) -> &[f64] {
        &self.data[..self.joint_count]
    }

    /// Overwrite one joint slot.
    ///
    /// # Panics
    /// Panics if `index >= joint_count`.
    #[inline]
    pub fn set_joint(&mut self, index: usize, position: f64) {
        assert!(index < self.joint_count, "joint index {index} out of range");
        self.data[index] = position;
    }

    /// Goal slots `[J, J+12)`.
    #[inline]
    pub fn goal_segment(&self) -> &[f64] {
        &self.data[self.joint_count..]
    }

    /// The six goal slots of one arm.
    pub fn goal(&self, arm: Arm) -> &[f64] {
        let start = self.joint_count + arm.goal_offset();
        &self.data[start..start + POSE_SLOTS]
    }

    /// Overwrite the six goal slots of one arm.
    pub fn write_goal(&mut self, arm: Arm, slots: [f64; POSE_SLOTS]) {
        let start = self.joint_count + arm.goal_offset();
        self.data[start..start + POSE_SLOTS].copy_from_slice(&slots);
    }
}

impl fmt::Display for StateVector {
    /// Space-separated dump used in diagnostics: `(q0 q1 ... | left | right)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                let boundary = i == self.joint_count || i == self.joint_count + POSE_SLOTS;
                f.write_str(if boundary { " | " } else { " " })?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}
