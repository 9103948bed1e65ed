//! Avoidance decision engine.
//!
//! One `AvoidanceEngine` owns the validated configuration, the cross-frame
//! `EngineState`, and the command sink. Each call to `process_frame` runs the
//! full chain (filter, select, state update, dispatch) for one frame and
//! returns a `FrameReport` describing what happened. Nothing in here renders
//! or blocks on the link.

mod config;
mod dispatch;
mod machine;
mod state;

pub use config::{
    EngineConfig, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_DEAD_ZONE_FRACTION,
    DEFAULT_MIN_AREA_THRESHOLD, DEFAULT_MIN_INTERVAL, DEFAULT_OBSTACLE_CLASSES,
};
pub use dispatch::{dispatch, force_dispatch, Dispatch};
pub use machine::{step, Decision, ReleaseReason, Transition};
pub use state::{DeadZone, EngineState, Mode, TrackTarget};

use anyhow::Result;
use std::time::Instant;

use crate::command::Command;
use crate::detect::{filter_obstacles, select_obstacle};
use crate::ingest::DetectionFrame;
use crate::report::FrameReport;
use crate::transport::CommandSink;

/// Running counters for health logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub frames: u64,
    pub commands_sent: u64,
    pub commands_dropped: u64,
    pub maneuvers: u64,
}

pub struct AvoidanceEngine<S: CommandSink> {
    config: EngineConfig,
    state: EngineState,
    sink: S,
    stats: EngineStats,
}

impl<S: CommandSink> AvoidanceEngine<S> {
    /// Validate `config` and build an engine in the `Searching` state.
    pub fn new(config: EngineConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: EngineState::new(),
            sink,
            stats: EngineStats::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one frame through filter, selector, state machine and dispatcher.
    pub fn process_frame(&mut self, frame: &DetectionFrame, now: Instant) -> FrameReport {
        let obstacles = filter_obstacles(&frame.detections, frame.frame_width, &self.config);
        let selected = select_obstacle(&obstacles);
        let zone = DeadZone::for_frame(frame.frame_width, self.config.dead_zone_fraction);

        let decision = step(&mut self.state, &obstacles, selected, zone, &self.config);
        if matches!(decision.transition, Some(Transition::Engaged { .. })) {
            self.stats.maneuvers += 1;
        }

        let outcome = dispatch(
            decision.command,
            now,
            &mut self.state,
            self.config.min_interval,
            &mut self.sink,
        );
        self.record(outcome);
        self.stats.frames += 1;

        FrameReport {
            frame_index: self.stats.frames,
            frame_width: frame.frame_width,
            dead_zone: zone,
            detections: frame.detections.len(),
            obstacles: obstacles.len(),
            selected: selected.copied(),
            mode: self.state.mode(),
            tracked: self.state.tracked(),
            transition: decision.transition,
            command: decision.command,
            dispatch: outcome,
        }
    }

    /// Send the safing `Center` command regardless of the rate limit.
    pub fn shutdown(&mut self, now: Instant) -> Dispatch {
        let outcome = force_dispatch(Command::Center, now, &mut self.state, &mut self.sink);
        self.record(outcome);
        log::info!(
            "safing command {} {} (mode was {:?})",
            Command::Center,
            match outcome {
                Dispatch::Sent => "sent",
                _ => "dropped",
            },
            self.state.mode()
        );
        outcome
    }

    /// Give back the sink so the caller can close it.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn record(&mut self, outcome: Dispatch) {
        match outcome {
            Dispatch::Sent => self.stats.commands_sent += 1,
            Dispatch::Dropped => self.stats.commands_dropped += 1,
            Dispatch::Throttled => {}
        }
    }
}
