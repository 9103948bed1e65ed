use serde::Serialize;
use std::time::Instant;

/// Avoidance machine mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Searching,
    Avoiding,
}

/// The obstacle a maneuver is committed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackTarget {
    Id(u64),
    /// Maneuver started by an obstacle without a track id. Never matches a
    /// later frame, so the maneuver ends on the next update.
    Untracked,
}

impl TrackTarget {
    pub fn from_track_id(track_id: Option<u64>) -> Self {
        match track_id {
            Some(id) => Self::Id(id),
            None => Self::Untracked,
        }
    }

    pub fn matches(self, track_id: Option<u64>) -> bool {
        match (self, track_id) {
            (Self::Id(tracked), Some(id)) => tracked == id,
            _ => false,
        }
    }
}

impl std::fmt::Display for TrackTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Untracked => write!(f, "untracked"),
        }
    }
}

/// Mutable state carried across frames by a single engine instance.
///
/// Mode and target change together through `engage`/`release`, keeping the
/// target present exactly while avoiding.
#[derive(Clone, Debug, Default)]
pub struct EngineState {
    mode: Mode,
    tracked: Option<TrackTarget>,
    pub(crate) last_sent: Option<Instant>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tracked(&self) -> Option<TrackTarget> {
        self.tracked
    }

    /// When the last command was handed to the transport.
    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }

    pub(crate) fn engage(&mut self, target: TrackTarget) {
        self.mode = Mode::Avoiding;
        self.tracked = Some(target);
    }

    pub(crate) fn release(&mut self) {
        self.mode = Mode::Searching;
        self.tracked = None;
    }
}

/// Horizontal band around the frame center that counts as "dead ahead".
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DeadZone {
    pub left: f32,
    pub right: f32,
}

impl DeadZone {
    pub fn for_frame(frame_width: u32, fraction: f32) -> Self {
        let width = frame_width as f32;
        let half_zone = width * fraction / 2.0;
        Self {
            left: width / 2.0 - half_zone,
            right: width / 2.0 + half_zone,
        }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, x: f32) -> bool {
        self.left <= x && x <= self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_zone_bounds_for_vga() {
        let zone = DeadZone::for_frame(640, 0.2);
        assert_eq!(zone.left, 256.0);
        assert_eq!(zone.right, 384.0);
        assert!(zone.contains(256.0));
        assert!(zone.contains(384.0));
        assert!(zone.contains(320.0));
        assert!(!zone.contains(100.0));
        assert!(!zone.contains(384.5));
    }

    #[test]
    fn engage_and_release_keep_target_and_mode_in_step() {
        let mut state = EngineState::new();
        assert_eq!(state.mode(), Mode::Searching);
        assert!(state.tracked().is_none());

        state.engage(TrackTarget::Id(7));
        assert_eq!(state.mode(), Mode::Avoiding);
        assert_eq!(state.tracked(), Some(TrackTarget::Id(7)));

        state.release();
        assert_eq!(state.mode(), Mode::Searching);
        assert!(state.tracked().is_none());
    }

    #[test]
    fn untracked_target_never_matches() {
        assert!(!TrackTarget::Untracked.matches(None));
        assert!(!TrackTarget::Untracked.matches(Some(0)));
        assert!(TrackTarget::Id(3).matches(Some(3)));
        assert!(!TrackTarget::Id(3).matches(None));
    }
}
