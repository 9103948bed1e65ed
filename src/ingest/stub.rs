//! Scripted synthetic detection feed (`stub://<scenario>`).
//!
//! Scenes are deterministic functions of the frame index so tests and demos
//! replay identically. Every scenario is finite.

use anyhow::{anyhow, Result};
use std::str::FromStr;

use super::{DetectionFrame, DetectionSource};
use crate::detect::{BoundingBox, Detection, ObjectClass};

const STUB_FRAME_WIDTH: u32 = 640;
const STUB_FRAME_HEIGHT: f32 = 480.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StubScenario {
    /// A pedestrian walks across the frame from left to right.
    Crossing,
    /// A car closes in dead ahead, then drifts right out of the dead zone
    /// while a distant bus stays parked on the left.
    Approach,
    /// An obstacle dead ahead whose track id the tracker keeps losing.
    Dropout,
    /// Nothing in view.
    Empty,
}

impl StubScenario {
    pub fn name(self) -> &'static str {
        match self {
            Self::Crossing => "crossing",
            Self::Approach => "approach",
            Self::Dropout => "dropout",
            Self::Empty => "empty",
        }
    }

    pub fn frame_count(self) -> u64 {
        match self {
            Self::Crossing => 64,
            Self::Approach => 40,
            Self::Dropout => 30,
            Self::Empty => 10,
        }
    }

    fn detections(self, index: u64) -> Vec<Detection> {
        match self {
            Self::Crossing => {
                // 10 px per frame, box 80 px wide.
                let left = -80.0 + index as f32 * 10.0;
                vec![obstacle(ObjectClass::Person, 1, left, left + 80.0, 120.0, 0.88)]
            }
            Self::Approach => {
                let mut dets = vec![obstacle(ObjectClass::Bus, 2, 0.0, 120.0, 300.0, 0.93)];
                let half = 30.0 + index.min(20) as f32 * 2.0;
                let center = if index < 20 {
                    320.0
                } else {
                    320.0 + (index - 20) as f32 * 12.0
                };
                dets.push(obstacle(ObjectClass::Car, 3, center - half, center + half, 150.0, 0.9));
                dets
            }
            Self::Dropout => {
                let mut det = obstacle(ObjectClass::Person, 5, 280.0, 360.0, 150.0, 0.85);
                if index % 4 == 3 {
                    det.track_id = None;
                }
                vec![det]
            }
            Self::Empty => Vec::new(),
        }
    }
}

impl FromStr for StubScenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "crossing" => Ok(Self::Crossing),
            "approach" => Ok(Self::Approach),
            "dropout" => Ok(Self::Dropout),
            "empty" => Ok(Self::Empty),
            other => Err(anyhow!(
                "unknown stub scenario '{}': expected crossing, approach, dropout or empty",
                other
            )),
        }
    }
}

fn obstacle(
    class: ObjectClass,
    track_id: u64,
    left: f32,
    right: f32,
    top: f32,
    confidence: f32,
) -> Detection {
    Detection {
        bbox: BoundingBox::new(left, top, right, STUB_FRAME_HEIGHT),
        class,
        confidence,
        track_id: Some(track_id),
    }
}

pub struct StubSource {
    scenario: StubScenario,
    frame_count: u64,
}

impl StubSource {
    pub fn new(scenario: StubScenario) -> Self {
        Self {
            scenario,
            frame_count: 0,
        }
    }
}

impl DetectionSource for StubSource {
    fn describe(&self) -> String {
        format!("stub://{}", self.scenario.name())
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>> {
        if self.frame_count >= self.scenario.frame_count() {
            return Ok(None);
        }
        let detections = self.scenario.detections(self.frame_count);
        self.frame_count += 1;
        Ok(Some(DetectionFrame {
            frame_width: STUB_FRAME_WIDTH,
            detections,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(mut source: StubSource) -> Vec<DetectionFrame> {
        let mut frames = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn scenarios_are_finite() {
        for scenario in [
            StubScenario::Crossing,
            StubScenario::Approach,
            StubScenario::Dropout,
            StubScenario::Empty,
        ] {
            let frames = drain(StubSource::new(scenario));
            assert_eq!(frames.len() as u64, scenario.frame_count());
        }
    }

    #[test]
    fn crossing_moves_left_to_right() {
        let frames = drain(StubSource::new(StubScenario::Crossing));
        let first = frames[0].detections[0].bbox.center_x();
        let last = frames.last().unwrap().detections[0].bbox.center_x();
        assert!(first < 0.0);
        assert!(last > STUB_FRAME_WIDTH as f32 / 2.0);
    }

    #[test]
    fn dropout_loses_track_id_periodically() {
        let frames = drain(StubSource::new(StubScenario::Dropout));
        assert_eq!(frames[3].detections[0].track_id, None);
        assert_eq!(frames[4].detections[0].track_id, Some(5));
    }
}
