use serde::Serialize;

use super::state::{DeadZone, EngineState, Mode, TrackTarget};
use super::EngineConfig;
use crate::command::{Command, SteeringMode};
use crate::detect::FilteredObstacle;

/// Why a maneuver ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseReason {
    /// The tracked obstacle moved out of the dead zone.
    Passed,
    /// The tracked obstacle is no longer reported this frame.
    LostTrack,
}

/// Mode change produced by one update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Transition {
    Engaged { target: TrackTarget },
    Released { target: TrackTarget, reason: ReleaseReason },
}

/// Result of one state update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub command: Command,
    pub transition: Option<Transition>,
}

impl Decision {
    fn hold(command: Command) -> Self {
        Self {
            command,
            transition: None,
        }
    }
}

/// Advance the machine by one frame.
///
/// `obstacles` is the full filtered set of the frame (used to find the
/// tracked obstacle while avoiding); `selected` is the selector's pick (used
/// to start a maneuver).
pub fn step(
    state: &mut EngineState,
    obstacles: &[FilteredObstacle],
    selected: Option<&FilteredObstacle>,
    zone: DeadZone,
    config: &EngineConfig,
) -> Decision {
    match config.steering_mode {
        SteeringMode::Tracking => step_tracking(state, obstacles, selected, zone, config),
        SteeringMode::Reactive => Decision::hold(reactive_command(selected, zone)),
    }
}

fn step_tracking(
    state: &mut EngineState,
    obstacles: &[FilteredObstacle],
    selected: Option<&FilteredObstacle>,
    zone: DeadZone,
    config: &EngineConfig,
) -> Decision {
    let turn = config.avoidance_direction.command();
    match (state.mode(), state.tracked()) {
        (Mode::Avoiding, Some(target)) => {
            let tracked = obstacles.iter().find(|obs| target.matches(obs.track_id()));
            match tracked {
                Some(obs) if zone.contains(obs.center_x) => Decision::hold(turn),
                Some(_) => release(state, target, ReleaseReason::Passed),
                None => release(state, target, ReleaseReason::LostTrack),
            }
        }
        _ => {
            let Some(obs) = selected else {
                return Decision::hold(Command::Center);
            };
            if !zone.contains(obs.center_x) {
                return Decision::hold(Command::Center);
            }
            if obs.track_id().is_none() && !config.allow_untracked_trigger {
                log::debug!(
                    "untracked {} ahead at x={:.1}; not eligible to start a maneuver",
                    obs.detection.class,
                    obs.center_x
                );
                return Decision::hold(Command::Center);
            }
            let target = TrackTarget::from_track_id(obs.track_id());
            state.engage(target);
            log::info!(
                "state: searching -> avoiding (target {}, {} at x={:.1}, turning {})",
                target,
                obs.detection.class,
                obs.center_x,
                turn
            );
            Decision {
                command: turn,
                transition: Some(Transition::Engaged { target }),
            }
        }
    }
}

fn release(state: &mut EngineState, target: TrackTarget, reason: ReleaseReason) -> Decision {
    state.release();
    match reason {
        ReleaseReason::Passed => {
            log::info!("state: avoiding -> searching (passed target {})", target)
        }
        ReleaseReason::LostTrack => {
            log::info!("state: avoiding -> searching (target {} lost)", target)
        }
    }
    Decision {
        command: Command::Center,
        transition: Some(Transition::Released { target, reason }),
    }
}

/// Stateless steering: turn away from the side the obstacle is on.
fn reactive_command(selected: Option<&FilteredObstacle>, zone: DeadZone) -> Command {
    match selected {
        None => Command::Center,
        Some(obs) if obs.center_x < zone.left => Command::TurnRight,
        Some(obs) if obs.center_x > zone.right => Command::TurnLeft,
        Some(_) => Command::Stop,
    }
}
