use serde::Serialize;
use std::time::{Duration, Instant};

use super::state::EngineState;
use crate::command::Command;
use crate::transport::CommandSink;

/// Outcome of one dispatch call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// Handed to the transport.
    Sent,
    /// Send attempted and failed; logged and discarded.
    Dropped,
    /// Inside the minimum interval; nothing written.
    Throttled,
}

/// Transmit `command` unless the previous send was less than `min_interval` ago.
///
/// `last_sent` advances only when the transport accepts the byte; after a
/// dropped send the next frame may try again.
pub fn dispatch<S: CommandSink + ?Sized>(
    command: Command,
    now: Instant,
    state: &mut EngineState,
    min_interval: Duration,
    sink: &mut S,
) -> Dispatch {
    if let Some(last) = state.last_sent {
        if now.saturating_duration_since(last) < min_interval {
            return Dispatch::Throttled;
        }
    }
    force_dispatch(command, now, state, sink)
}

/// Transmit `command` ignoring the interval gate. Used for the safing command.
pub fn force_dispatch<S: CommandSink + ?Sized>(
    command: Command,
    now: Instant,
    state: &mut EngineState,
    sink: &mut S,
) -> Dispatch {
    match sink.send(&[command.as_byte()]) {
        Ok(()) => {
            state.last_sent = Some(now);
            log::debug!("sent {} via {}", command, sink.name());
            Dispatch::Sent
        }
        Err(err) => {
            log::warn!("command {} dropped by {} sink: {}", command, sink.name(), err);
            Dispatch::Dropped
        }
    }
}
