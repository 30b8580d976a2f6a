//! Inbound event loop.
//!
//! Reads newline-delimited JSON events and feeds them to the control loop one
//! at a time, each callback running to completion before the next line is
//! read. Blank lines are ignored; malformed lines are logged and skipped.

use std::io::{self, BufRead};

use tracing::{debug, warn};
use wbc_common::solver::Solver;

use crate::control_loop::ControlLoop;
use crate::transport::{InboundEvent, OutputSink};

/// What a serve run consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServeSummary {
    /// Events decoded and handled.
    pub events: u64,
    /// Non-blank lines that failed to decode.
    pub malformed: u64,
}

/// Serve events from `reader` until end of input.
///
/// # Errors
/// Only read errors end the loop early; decode failures never do.
pub fn serve<R, S, O>(mut reader: R, control: &mut ControlLoop<S, O>) -> io::Result<ServeSummary>
where
    R: BufRead,
    S: Solver,
    O: OutputSink,
{
    let mut summary = ServeSummary::default();
    let mut buf = Vec::new();
    let mut line_no: u64 = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            debug!("End of input after {line_no} lines");
            return Ok(summary);
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match InboundEvent::from_json(line) {
            Ok(event) => {
                control.handle(&event);
                summary.events += 1;
            }
            Err(e) => {
                warn!("Skipping malformed event on line {line_no}: {e}");
                summary.malformed += 1;
            }
        }
    }
}
