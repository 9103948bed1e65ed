//! Obstacle Avoidance Kernel
//!
//! This crate turns per-frame object detections into discrete steering
//! commands for a remote actuator reached over an unreliable datagram link.
//!
//! # Architecture
//!
//! Each frame flows through four stages, leaves first:
//!
//! 1. **Detection filter**: keeps confident detections of obstacle classes
//!    whose box is large enough to matter.
//! 2. **Obstacle selector**: picks the largest box as the proximity proxy.
//! 3. **Avoidance state machine**: `Searching`/`Avoiding` hysteresis keyed on
//!    the tracker's identifiers and a central dead zone.
//! 4. **Command dispatcher**: rate-limits one-byte commands to the actuator.
//!
//! Detection and tracking happen upstream; rendering happens downstream from
//! `FrameReport`s. The engine itself is data in, data out.
//!
//! # Module Structure
//!
//! - `detect`: detection types, filter, selector
//! - `engine`: configuration, state, state machine, dispatcher, `AvoidanceEngine`
//! - `ingest`: detection sources (JSON lines, synthetic scenes)
//! - `transport`: `CommandSink` and the UDP/log/memory sinks
//! - `report`: per-frame decision records and the trace writer
//! - `runner`: the cooperative per-frame loop with safing on shutdown
//! - `config`: startup configuration from file and environment

pub mod command;
pub mod config;
pub mod detect;
pub mod engine;
pub mod ingest;
pub mod report;
pub mod runner;
pub mod transport;

pub use command::{AvoidanceDirection, Command, SteeringMode};
pub use detect::{
    filter_obstacles, select_obstacle, BoundingBox, Detection, FilteredObstacle, ObjectClass,
};
pub use engine::{
    AvoidanceEngine, DeadZone, Dispatch, EngineConfig, EngineState, EngineStats, Mode,
    TrackTarget,
};
pub use ingest::{open_source, DetectionFrame, DetectionSource, JsonLinesSource};
#[cfg(feature = "stub-detection-source")]
pub use ingest::{StubScenario, StubSource};
pub use report::{FrameReport, TraceWriter};
pub use runner::{run_loop, LoopOptions, LoopSummary, StopReason};
pub use transport::{
    parse_actuator_endpoint, ActuatorEndpoint, CommandSink, LogSink, MemorySink, TransportError,
    UdpCommandSink,
};
