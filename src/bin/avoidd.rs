//! avoidd - obstacle avoidance daemon
//!
//! This daemon:
//! 1. Reads per-frame detections from a tracker feed (JSON lines or stub scene)
//! 2. Filters and selects the obstacle that drives the decision
//! 3. Runs the Searching/Avoiding state machine
//! 4. Sends rate-limited one-byte steering commands to the actuator over UDP
//! 5. Sends a final `C` (center) on Ctrl-C or when the feed ends

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use avoidance_kernel::config::AvoiddConfig;
use avoidance_kernel::{
    open_source, run_loop, AvoidanceEngine, CommandSink, LogSink, LoopOptions, TraceWriter,
    UdpCommandSink,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Steer around obstacles reported by a tracker")]
struct Args {
    /// Detection feed: a JSON-lines file, '-' for stdin, or stub://<scenario>
    /// (crossing, approach, dropout, empty).
    #[arg(long, env = "AVOID_SOURCE", default_value = "-")]
    source: String,

    /// Log commands instead of sending them to the actuator.
    #[arg(long, env = "AVOID_DRY_RUN")]
    dry_run: bool,

    /// Write one JSON frame report per line to this file.
    #[arg(long, env = "AVOID_TRACE_OUT")]
    trace_out: Option<PathBuf>,

    /// Delay between frames in milliseconds (pacing for recorded feeds).
    #[arg(long, env = "AVOID_FRAME_DELAY_MS", default_value_t = 0)]
    frame_delay_ms: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AvoiddConfig::load()?;
    log::info!(
        "avoidd {} starting: direction={:?} dead_zone={} interval={}ms mode={}",
        env!("CARGO_PKG_VERSION"),
        config.engine.avoidance_direction,
        config.engine.dead_zone_fraction,
        config.engine.min_interval.as_millis(),
        config.engine.steering_mode
    );

    let sink: Box<dyn CommandSink> = if args.dry_run {
        log::info!("dry run: commands for {} will only be logged", config.actuator);
        Box::new(LogSink::new())
    } else {
        let sink = UdpCommandSink::connect(&config.actuator)?;
        log::info!("sending commands to {} ({})", config.actuator, sink.peer());
        Box::new(sink)
    };
    let mut engine = AvoidanceEngine::new(config.engine.clone(), sink)?;
    let mut source = open_source(&args.source)?;

    let mut trace = match &args.trace_out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create trace file {}", path.display()))?;
            log::info!("writing frame reports to {}", path.display());
            Some(TraceWriter::new(BufWriter::new(file)))
        }
        None => None,
    };

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || {
        stop_handler.store(true, Ordering::SeqCst);
    })
    .expect("error setting Ctrl-C handler");

    let options = LoopOptions {
        frame_delay: Duration::from_millis(args.frame_delay_ms),
        ..LoopOptions::default()
    };
    let result = run_loop(source.as_mut(), &mut engine, &stop, &options, |report| {
        if let Some(writer) = trace.as_mut() {
            writer.write(report)?;
        }
        if report.transition.is_some() {
            log::debug!("{}", report.overlay_lines().join(" | "));
        }
        Ok(())
    });

    if let Some(writer) = trace.take() {
        let written = writer.written();
        writer.finish()?;
        log::info!("wrote {} frame reports", written);
    }
    drop(engine.into_sink());
    log::info!("actuator transport closed");

    let summary = result?;
    log::info!(
        "avoidd stopped ({:?}) after {} frames, {} maneuvers",
        summary.reason,
        summary.stats.frames,
        summary.stats.maneuvers
    );
    Ok(())
}
