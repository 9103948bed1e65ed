use anyhow::{anyhow, Result};
use std::time::Duration;

use crate::command::{AvoidanceDirection, SteeringMode};
use crate::detect::ObjectClass;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MIN_AREA_THRESHOLD: f32 = 8000.0;
pub const DEFAULT_DEAD_ZONE_FRACTION: f32 = 0.4;
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_OBSTACLE_CLASSES: &[ObjectClass] = &[
    ObjectClass::Person,
    ObjectClass::Bicycle,
    ObjectClass::Car,
    ObjectClass::Motorcycle,
    ObjectClass::Bus,
    ObjectClass::Train,
    ObjectClass::Truck,
];

/// Decision engine parameters. Validated once when the engine is built and
/// never changed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Detections must score strictly above this.
    pub confidence_threshold: f32,
    /// Minimum box area in pixels² (strict).
    pub min_area_threshold: f32,
    pub obstacle_classes: Vec<ObjectClass>,
    /// Width of the central dead zone as a fraction of frame width, in (0, 1).
    pub dead_zone_fraction: f32,
    pub avoidance_direction: AvoidanceDirection,
    /// Minimum spacing between transmitted commands.
    pub min_interval: Duration,
    pub steering_mode: SteeringMode,
    /// Whether an obstacle without a track id may start a maneuver.
    pub allow_untracked_trigger: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            min_area_threshold: DEFAULT_MIN_AREA_THRESHOLD,
            obstacle_classes: DEFAULT_OBSTACLE_CLASSES.to_vec(),
            dead_zone_fraction: DEFAULT_DEAD_ZONE_FRACTION,
            avoidance_direction: AvoidanceDirection::Left,
            min_interval: DEFAULT_MIN_INTERVAL,
            steering_mode: SteeringMode::Tracking,
            allow_untracked_trigger: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!(
                "confidence threshold must be within 0..=1 (got {})",
                self.confidence_threshold
            ));
        }
        if !self.min_area_threshold.is_finite() || self.min_area_threshold < 0.0 {
            return Err(anyhow!(
                "minimum area threshold must be a non-negative number of pixels (got {})",
                self.min_area_threshold
            ));
        }
        if self.obstacle_classes.is_empty() {
            return Err(anyhow!("obstacle class set must not be empty"));
        }
        if self.obstacle_classes.contains(&ObjectClass::Unknown) {
            return Err(anyhow!("'unknown' is not a valid obstacle class"));
        }
        if !(self.dead_zone_fraction > 0.0 && self.dead_zone_fraction < 1.0) {
            return Err(anyhow!(
                "dead-zone fraction must be strictly between 0 and 1 (got {})",
                self.dead_zone_fraction
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_dead_zone_outside_open_unit_interval() {
        for fraction in [0.0, 1.0, 1.5, -0.1, f32::NAN] {
            let cfg = EngineConfig {
                dead_zone_fraction: fraction,
                ..EngineConfig::default()
            };
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("dead-zone"), "{}", err);
        }
    }

    #[test]
    fn rejects_empty_class_set() {
        let cfg = EngineConfig {
            obstacle_classes: vec![],
            ..EngineConfig::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let cfg = EngineConfig {
            confidence_threshold: 1.2,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = EngineConfig {
            min_area_threshold: -1.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
