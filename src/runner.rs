//! Per-frame cooperative processing loop.
//!
//! One frame is fully processed before the next is pulled from the source.
//! The stop flag is checked once per frame. Whatever ends the loop (stop
//! signal, exhausted feed, or a source failure), the safing `Center` command
//! goes out before the function returns.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::engine::{AvoidanceEngine, EngineStats};
use crate::ingest::DetectionSource;
use crate::report::FrameReport;
use crate::transport::CommandSink;

#[derive(Clone, Debug)]
pub struct LoopOptions {
    /// Sleep between frames; zero processes as fast as the source delivers.
    pub frame_delay: Duration,
    pub health_interval: Duration,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            frame_delay: Duration::ZERO,
            health_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The stop flag was raised.
    Signalled,
    /// The source reported end of feed.
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub reason: StopReason,
    pub stats: EngineStats,
}

/// Drive `engine` from `source` until stopped or exhausted.
///
/// `on_report` receives every frame report (trace writers, overlays). An
/// error from the source or from `on_report` ends the loop; the safing
/// command is still sent and the error is returned.
pub fn run_loop<S, F>(
    source: &mut dyn DetectionSource,
    engine: &mut AvoidanceEngine<S>,
    stop: &AtomicBool,
    options: &LoopOptions,
    mut on_report: F,
) -> Result<LoopSummary>
where
    S: CommandSink,
    F: FnMut(&FrameReport) -> Result<()>,
{
    log::info!(
        "processing {} ({} steering, actuator sink: {})",
        source.describe(),
        engine.config().steering_mode,
        engine.sink().name()
    );
    let mut last_health_log = Instant::now();

    let outcome = loop {
        if stop.load(Ordering::SeqCst) {
            log::info!("stop signal received");
            break Ok(StopReason::Signalled);
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break Ok(StopReason::Exhausted),
            Err(err) => break Err(err),
        };

        let report = engine.process_frame(&frame, Instant::now());
        if let Err(err) = on_report(&report) {
            break Err(err);
        }

        if last_health_log.elapsed() >= options.health_interval {
            let stats = engine.stats();
            log::info!(
                "health: frames={} sent={} dropped={} maneuvers={} mode={:?}",
                stats.frames,
                stats.commands_sent,
                stats.commands_dropped,
                stats.maneuvers,
                engine.state().mode()
            );
            last_health_log = Instant::now();
        }

        if !options.frame_delay.is_zero() {
            std::thread::sleep(options.frame_delay);
        }
    };

    engine.shutdown(Instant::now());

    let reason = outcome.map_err(|err| {
        log::error!("processing loop failed: {:#}", err);
        err
    })?;
    let stats = engine.stats();
    log::info!(
        "processing loop finished ({:?}): frames={} sent={} dropped={} maneuvers={}",
        reason,
        stats.frames,
        stats.commands_sent,
        stats.commands_dropped,
        stats.maneuvers
    );
    Ok(LoopSummary { reason, stats })
}
