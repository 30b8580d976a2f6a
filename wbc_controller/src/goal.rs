//! Goal intake: deduplication, frame validation, and projection into the
//! goal segment of the state vector.
//!
//! A goal whose fingerprint equals the previous one is skipped before any
//! validation, including when that previous goal was rejected. A goal
//! with a foreign frame on either pose is rejected as a whole and the goal
//! segment is left untouched.

use thiserror::Error;
use tracing::{debug, warn};
use wbc_common::fingerprint::GoalFingerprint;
use wbc_common::geometry::encode_pose;
use wbc_common::messages::{FramedPose, WholeBodyGoal};

use crate::state::{Arm, StateVector};

/// Reason a goal was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalRejection {
    /// A pose is not expressed in the reference frame.
    #[error("frame_id of {arm} EE goal was '{actual}', expected '{expected}'")]
    FrameMismatch {
        arm: Arm,
        expected: String,
        actual: String,
    },
}

/// Result of [`GoalIntake::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalOutcome {
    /// Same fingerprint as the previous submission; nothing happened.
    Duplicate,
    /// Dropped; the state vector is unchanged.
    Rejected(GoalRejection),
    /// Written into the goal segment.
    Accepted,
}

/// Validates and projects incoming goals.
#[derive(Debug, Clone)]
pub struct GoalIntake {
    frame_id: String,
    last_fingerprint: Option<GoalFingerprint>,
}

impl GoalIntake {
    pub fn new(frame_id: impl Into<String>) -> Self {
        Self {
            frame_id: frame_id.into(),
            last_fingerprint: None,
        }
    }

    /// Fingerprint of the last non-duplicate submission, accepted or not.
    #[inline]
    pub fn last_fingerprint(&self) -> Option<GoalFingerprint> {
        self.last_fingerprint
    }

    /// Deduplicate, validate, and write a goal into `state`.
    pub fn submit(&mut self, state: &mut StateVector, goal: &WholeBodyGoal) -> GoalOutcome {
        let fingerprint = GoalFingerprint::of(goal);
        if self.last_fingerprint == Some(fingerprint) {
            debug!("Goal {fingerprint} already processed, skipping");
            return GoalOutcome::Duplicate;
        }
        self.last_fingerprint = Some(fingerprint);

        for (arm, pose) in [(Arm::Left, &goal.left_ee_goal), (Arm::Right, &goal.right_ee_goal)] {
            if let Err(rejection) = self.check_frame(arm, pose) {
                warn!("{rejection}. Ignoring goal");
                return GoalOutcome::Rejected(rejection);
            }
        }

        state.write_goal(Arm::Left, encode_pose(&goal.left_ee_goal.pose));
        state.write_goal(Arm::Right, encode_pose(&goal.right_ee_goal.pose));
        debug!("Goal {fingerprint} accepted");
        GoalOutcome::Accepted
    }

    fn check_frame(&self, arm: Arm, pose: &FramedPose) -> Result<(), GoalRejection> {
        if pose.frame_id == self.frame_id {
            Ok(())
        } else {
            Err(GoalRejection::FrameMismatch {
                arm,
                expected: self.frame_id.clone(),
                actual: pose.frame_id.clone(),
            })
        }
    }
}
