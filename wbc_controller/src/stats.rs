//! Control loop counters.

use std::fmt;

/// Running totals, updated by the control loop callbacks. O(1), no allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerStats {
    /// Joint-state messages received.
    pub joint_state_messages: u64,
    /// Successful solver updates. Each one attempts a dispatch, which may still
    /// fail (see `dispatch_failures`).
    pub ticks: u64,
    /// Ticks skipped because the solver update failed.
    pub failed_updates: u64,
    /// Ticks whose dispatch hit a transport error.
    pub dispatch_failures: u64,
    /// Goals written into the state vector.
    pub goals_accepted: u64,
    /// Goals dropped for a frame mismatch.
    pub goals_rejected: u64,
    /// Goals skipped as repeats of the previous one.
    pub goals_duplicate: u64,
    /// Solver start attempts (successful or not).
    pub start_attempts: u64,
}

impl fmt::Display for ControllerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "joint_states={} ticks={} failed_updates={} dispatch_failures={} \
             goals(accepted={} rejected={} duplicate={}) start_attempts={}",
            self.joint_state_messages,
            self.ticks,
            self.failed_updates,
            self.dispatch_failures,
            self.goals_accepted,
            self.goals_rejected,
            self.goals_duplicate,
            self.start_attempts
        )
    }
}
