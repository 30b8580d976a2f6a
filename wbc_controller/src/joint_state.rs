//! Joint-state synchronization into the state vector.
//!
//! Every inbound joint-state message overwrites the slots of the tracked
//! joints it names. Untracked names are ignored; tracked joints that are not
//! named keep their last value.

use std::collections::HashMap;

use tracing::trace;
use wbc_common::messages::JointState;

use crate::state::StateVector;

/// Name → slot mapping for the tracked joints, plus observation bookkeeping.
#[derive(Debug, Clone)]
pub struct JointStateBuffer {
    names: Vec<String>,
    index: HashMap<String, usize>,
    /// Whether each tracked joint has been reported at least once.
    observed: Vec<bool>,
}

impl JointStateBuffer {
    /// Build the mapping. Names must be unique (checked by config validation).
    pub fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self {
            observed: vec![false; names.len()],
            names,
            index,
        }
    }

    /// Apply one message. Returns the number of slot writes performed.
    ///
    /// A name repeated within one message is applied in order, so its last
    /// position wins.
    pub fn apply(&mut self, state: &mut StateVector, msg: &JointState) -> usize {
        let mut written = 0;
        for (name, position) in msg.observations() {
            if let Some(&slot) = self.index.get(name) {
                state.set_joint(slot, position);
                self.observed[slot] = true;
                written += 1;
            }
        }
        trace!(
            "Joint state: {written} of {} entries matched tracked joints",
            msg.name.len()
        );
        written
    }

    /// Tracked joints that no message has reported yet.
    pub fn never_observed(&self) -> Vec<&str> {
        self.names
            .iter()
            .zip(&self.observed)
            .filter(|(_, seen)| !**seen)
            .map(|(n, _)| n.as_str())
            .collect()
    }
}
