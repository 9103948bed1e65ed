//! Per-frame decision records.
//!
//! A `FrameReport` is the only surface that visualization or tracing code
//! sees. Overlay renderers draw from `overlay_lines` and the dead-zone bounds;
//! `TraceWriter` persists reports as JSON lines for offline review.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::command::Command;
use crate::detect::FilteredObstacle;
use crate::engine::{DeadZone, Dispatch, Mode, TrackTarget, Transition};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    /// 1-based frame counter since the engine started.
    pub frame_index: u64,
    pub frame_width: u32,
    pub dead_zone: DeadZone,
    /// Raw detections received.
    pub detections: usize,
    /// Detections that passed the filter.
    pub obstacles: usize,
    pub selected: Option<FilteredObstacle>,
    /// Mode after the update.
    pub mode: Mode,
    pub tracked: Option<TrackTarget>,
    pub transition: Option<Transition>,
    pub command: Command,
    pub dispatch: Dispatch,
}

impl FrameReport {
    /// Status text for an on-screen overlay.
    pub fn overlay_lines(&self) -> Vec<String> {
        let mode = match self.mode {
            Mode::Searching => "SEARCHING",
            Mode::Avoiding => "AVOIDING",
        };
        let tracking = self
            .tracked
            .map(|target| target.to_string())
            .unwrap_or_else(|| "None".to_string());
        vec![
            format!("State: {}", mode),
            format!("Tracking ID: {}", tracking),
            format!("Command: {}", self.command),
        ]
    }
}

/// Writes one JSON object per frame.
pub struct TraceWriter<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write(&mut self, report: &FrameReport) -> Result<()> {
        serde_json::to_writer(&mut self.out, report).context("serialize frame report")?;
        self.out.write_all(b"\n").context("write frame report")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush().context("flush frame reports")?;
        Ok(self.out)
    }
}
