//! Command and feedback dispatch after a successful tick.

use wbc_common::messages::{ControllerFeedback, JointCommand};

use crate::transport::{OutputSink, TransportError};

/// Per-joint command channel: `/{base}_velocity_controller/command`, where
/// `base` is the joint name without `suffix` (unchanged if it lacks it).
pub fn command_channel(joint_name: &str, suffix: &str) -> String {
    let base = joint_name.strip_suffix(suffix).unwrap_or(joint_name);
    format!("/{base}_velocity_controller/command")
}

/// Fans solver outputs out to the per-joint channels and the feedback record.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    channels: Vec<String>,
    feedback: ControllerFeedback,
}

impl CommandDispatcher {
    /// Fix channel names and feedback names once, at startup.
    pub fn new(
        joint_names: &[String],
        suffix: &str,
        controllable_names: &[String],
        soft_constraint_names: &[String],
    ) -> Self {
        Self {
            channels: joint_names
                .iter()
                .map(|n| command_channel(n, suffix))
                .collect(),
            feedback: ControllerFeedback::with_names(
                controllable_names.iter().cloned(),
                soft_constraint_names.iter().cloned(),
            ),
        }
    }

    /// Per-joint channels, in joint order.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Feedback record as last published.
    pub fn feedback(&self) -> &ControllerFeedback {
        &self.feedback
    }

    /// Publish `command[i]` on channel `i`, then the feedback record.
    ///
    /// Stops at the first transport error; the next tick re-issues every
    /// value anyway.
    pub fn dispatch<O: OutputSink>(
        &mut self,
        sink: &mut O,
        command: &[f64],
        slack: &[f64],
    ) -> Result<(), TransportError> {
        for (channel, &data) in self.channels.iter().zip(command) {
            sink.publish_command(channel, JointCommand { data })?;
        }

        for (entry, &value) in self.feedback.commands.iter_mut().zip(command) {
            entry.value = value;
        }
        for (entry, &value) in self.feedback.slacks.iter_mut().zip(slack) {
            entry.value = value;
        }
        sink.publish_feedback(&self.feedback)
    }
}
