//! Message transport bindings.
//!
//! The control loop only sees [`OutputSink`]; how messages leave the process
//! is up to the binding:
//!
//! - [`JsonLinesSink`] - one JSON envelope per line on any `Write`
//! - [`LatchedBus`] - in-memory, latest value per channel, with publish counters
//!
//! Every output channel is latest-value-wins: a new publish supersedes the
//! previous value, nothing is queued. The goal echo is retained.

use std::collections::HashMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wbc_common::consts::{CURRENT_GOAL_CHANNEL, FEEDBACK_CHANNEL};
use wbc_common::messages::{ControllerFeedback, JointCommand, JointState, WholeBodyGoal};

/// Errors raised while emitting a message.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outbound side of the transport.
pub trait OutputSink {
    /// Publish one scalar command on a per-joint channel.
    fn publish_command(&mut self, channel: &str, command: JointCommand) -> Result<(), TransportError>;

    /// Publish the aggregated feedback record.
    fn publish_feedback(&mut self, feedback: &ControllerFeedback) -> Result<(), TransportError>;

    /// Publish (and retain) the last accepted goal.
    fn publish_goal(&mut self, goal: &WholeBodyGoal) -> Result<(), TransportError>;
}

// ─── Inbound ────────────────────────────────────────────────────────

/// One inbound event, tagged by `type` on the wire.
///
/// ```json
/// {"type":"joint_state","name":["a_joint"],"position":[0.1]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    JointState(JointState),
    Goal(WholeBodyGoal),
}

impl InboundEvent {
    /// Decode one JSON line.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

// ─── JSON Lines ─────────────────────────────────────────────────────

/// Outbound wire envelope: `{"channel": ..., "payload": ...}`.
#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    channel: &'a str,
    payload: &'a T,
}

/// Writes each published message as one JSON line and flushes immediately.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit<T: Serialize>(&mut self, channel: &str, payload: &T) -> Result<(), TransportError> {
        serde_json::to_writer(&mut self.writer, &Envelope { channel, payload })?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> OutputSink for JsonLinesSink<W> {
    fn publish_command(&mut self, channel: &str, command: JointCommand) -> Result<(), TransportError> {
        self.emit(channel, &command)
    }

    fn publish_feedback(&mut self, feedback: &ControllerFeedback) -> Result<(), TransportError> {
        self.emit(FEEDBACK_CHANNEL, feedback)
    }

    fn publish_goal(&mut self, goal: &WholeBodyGoal) -> Result<(), TransportError> {
        self.emit(CURRENT_GOAL_CHANNEL, goal)
    }
}

// ─── In-memory latched bus ──────────────────────────────────────────

/// Number of publishes seen per channel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishCounts {
    pub commands: u64,
    pub feedback: u64,
    pub goals: u64,
}

/// In-memory sink holding only the latest value of every channel.
#[derive(Debug, Clone, Default)]
pub struct LatchedBus {
    commands: HashMap<String, f64>,
    feedback: Option<ControllerFeedback>,
    current_goal: Option<WholeBodyGoal>,
    counts: PublishCounts,
}

impl LatchedBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest command on a per-joint channel.
    pub fn command(&self, channel: &str) -> Option<f64> {
        self.commands.get(channel).copied()
    }

    /// Channels that have carried at least one command, sorted.
    pub fn command_channels(&self) -> Vec<&str> {
        let mut channels: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        channels.sort_unstable();
        channels
    }

    pub fn feedback(&self) -> Option<&ControllerFeedback> {
        self.feedback.as_ref()
    }

    /// Retained goal echo, as a late subscriber would see it.
    pub fn current_goal(&self) -> Option<&WholeBodyGoal> {
        self.current_goal.as_ref()
    }

    pub fn counts(&self) -> PublishCounts {
        self.counts
    }
}

impl OutputSink for LatchedBus {
    fn publish_command(&mut self, channel: &str, command: JointCommand) -> Result<(), TransportError> {
        match self.commands.get_mut(channel) {
            Some(slot) => *slot = command.data,
            None => {
                self.commands.insert(channel.to_string(), command.data);
            }
        }
        self.counts.commands += 1;
        Ok(())
    }

    fn publish_feedback(&mut self, feedback: &ControllerFeedback) -> Result<(), TransportError> {
        match &mut self.feedback {
            Some(slot) => slot.clone_from(feedback),
            None => self.feedback = Some(feedback.clone()),
        }
        self.counts.feedback += 1;
        Ok(())
    }

    fn publish_goal(&mut self, goal: &WholeBodyGoal) -> Result<(), TransportError> {
        self.current_goal = Some(goal.clone());
        self.counts.goals += 1;
        Ok(())
    }
}
