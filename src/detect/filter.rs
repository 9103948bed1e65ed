use serde::Serialize;

use crate::detect::result::Detection;
use crate::engine::EngineConfig;

/// A detection that passed relevance screening for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FilteredObstacle {
    pub detection: Detection,
    /// Box midpoint, clamped into `[0, frame_width]`.
    pub center_x: f32,
    pub area: f32,
}

impl FilteredObstacle {
    pub fn from_detection(detection: Detection, frame_width: u32) -> Self {
        let center_x = detection.bbox.center_x().clamp(0.0, frame_width as f32);
        Self {
            detection,
            center_x,
            area: detection.bbox.area(),
        }
    }

    pub fn track_id(&self) -> Option<u64> {
        self.detection.track_id
    }
}

/// Keep detections that are confident, of an obstacle class, and large enough.
///
/// All three comparisons are strict; input order is preserved.
pub fn filter_obstacles(
    detections: &[Detection],
    frame_width: u32,
    config: &EngineConfig,
) -> Vec<FilteredObstacle> {
    detections
        .iter()
        .filter(|det| det.confidence > config.confidence_threshold)
        .filter(|det| config.obstacle_classes.contains(&det.class))
        .filter(|det| det.bbox.area() > config.min_area_threshold)
        .map(|det| FilteredObstacle::from_detection(*det, frame_width))
        .collect()
}
