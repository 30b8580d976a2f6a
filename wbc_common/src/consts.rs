//! System-wide constants for the WBC workspace.
//!
//! Single source of truth for state-vector layout, defaults, and
//! well-known output channel names.

/// Number of slots one end-effector goal occupies in the state vector
/// (position x, y, z + Euler-ZYX angles).
pub const POSE_SLOTS: usize = 6;

/// Number of goal slots appended after the joint positions (left + right arm).
pub const GOAL_SLOTS: usize = 2 * POSE_SLOTS;

/// Default solver iteration budget per start/update call.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Trailing token stripped from a joint name to derive its command channel.
pub const DEFAULT_JOINT_SUFFIX: &str = "_joint";

/// Output channel carrying the aggregated controller feedback.
pub const FEEDBACK_CHANNEL: &str = "feedback";

/// Retained output channel echoing the last accepted goal.
pub const CURRENT_GOAL_CHANNEL: &str = "current_goal";

/// Interval (in ticks) between periodic statistics log lines.
pub const STATS_LOG_INTERVAL: u64 = 1000;
