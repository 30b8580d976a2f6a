//! Content fingerprint of a goal, used to detect repeated submissions.
//!
//! SHA-256 over a canonical little-endian encoding of both framed poses.
//! Floats are hashed by bit pattern, so the digest is stable across runs
//! and platforms.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::messages::{FramedPose, WholeBodyGoal};

/// 256-bit digest of a [`WholeBodyGoal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoalFingerprint([u8; 32]);

impl GoalFingerprint {
    /// Fingerprint a goal exactly as received.
    pub fn of(goal: &WholeBodyGoal) -> Self {
        let mut hasher = Sha256::new();
        feed_framed_pose(&mut hasher, &goal.left_ee_goal);
        feed_framed_pose(&mut hasher, &goal.right_ee_goal);

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }
}

impl fmt::Display for GoalFingerprint {
    /// Short hex form (first 8 bytes) for log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

fn feed_framed_pose(hasher: &mut Sha256, framed: &FramedPose) {
    hasher.update((framed.frame_id.len() as u64).to_le_bytes());
    hasher.update(framed.frame_id.as_bytes());

    let p = &framed.pose.position;
    let q = &framed.pose.orientation;
    for v in [p.x, p.y, p.z, q.x, q.y, q.z, q.w] {
        hasher.update(v.to_bits().to_le_bytes());
    }
}
