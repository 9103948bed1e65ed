use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::command::{AvoidanceDirection, SteeringMode};
use crate::detect::ObjectClass;
use crate::engine::{
    EngineConfig, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_DEAD_ZONE_FRACTION,
    DEFAULT_MIN_AREA_THRESHOLD, DEFAULT_MIN_INTERVAL, DEFAULT_OBSTACLE_CLASSES,
};
use crate::transport::{parse_actuator_endpoint, ActuatorEndpoint};

const DEFAULT_ACTUATOR_ADDR: &str = "192.168.147.27:12345";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AvoiddConfigFile {
    actuator: Option<ActuatorConfigFile>,
    detection: Option<DetectionConfigFile>,
    avoidance: Option<AvoidanceConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ActuatorConfigFile {
    addr: Option<String>,
    min_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DetectionConfigFile {
    confidence_threshold: Option<f32>,
    min_area: Option<f32>,
    classes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AvoidanceConfigFile {
    dead_zone_fraction: Option<f32>,
    direction: Option<String>,
    steering_mode: Option<String>,
    allow_untracked_trigger: Option<bool>,
}

/// Startup configuration for `avoidd`: engine parameters plus the actuator
/// address. Resolved once, then handed to the engine and transport.
#[derive(Debug, Clone)]
pub struct AvoiddConfig {
    pub engine: EngineConfig,
    pub actuator: ActuatorEndpoint,
}

impl AvoiddConfig {
    /// Defaults, then the file named by `AVOID_CONFIG`, then `AVOID_*`
    /// environment overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("AVOID_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AvoiddConfigFile) -> Result<Self> {
        let actuator_addr = file
            .actuator
            .as_ref()
            .and_then(|actuator| actuator.addr.clone())
            .unwrap_or_else(|| DEFAULT_ACTUATOR_ADDR.to_string());
        let actuator = parse_actuator_endpoint(&actuator_addr)?;
        let min_interval = file
            .actuator
            .as_ref()
            .and_then(|actuator| actuator.min_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MIN_INTERVAL);

        let detection = file.detection.unwrap_or_default();
        let obstacle_classes = match detection.classes {
            Some(labels) => parse_classes(labels.iter().map(String::as_str))?,
            None => DEFAULT_OBSTACLE_CLASSES.to_vec(),
        };

        let avoidance = file.avoidance.unwrap_or_default();
        let avoidance_direction = match avoidance.direction.as_deref() {
            Some(direction) => direction.parse()?,
            None => AvoidanceDirection::default(),
        };
        let steering_mode = match avoidance.steering_mode.as_deref() {
            Some(mode) => mode.parse()?,
            None => SteeringMode::default(),
        };

        Ok(Self {
            engine: EngineConfig {
                confidence_threshold: detection
                    .confidence_threshold
                    .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
                min_area_threshold: detection.min_area.unwrap_or(DEFAULT_MIN_AREA_THRESHOLD),
                obstacle_classes,
                dead_zone_fraction: avoidance
                    .dead_zone_fraction
                    .unwrap_or(DEFAULT_DEAD_ZONE_FRACTION),
                avoidance_direction,
                min_interval,
                steering_mode,
                allow_untracked_trigger: avoidance.allow_untracked_trigger.unwrap_or(false),
            },
            actuator,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(addr) = env_value("AVOID_ACTUATOR_ADDR") {
            self.actuator = parse_actuator_endpoint(&addr)?;
        }
        if let Some(value) = env_value("AVOID_CONFIDENCE") {
            self.engine.confidence_threshold = value
                .parse()
                .map_err(|_| anyhow!("AVOID_CONFIDENCE must be a number between 0 and 1"))?;
        }
        if let Some(value) = env_value("AVOID_MIN_AREA") {
            self.engine.min_area_threshold = value
                .parse()
                .map_err(|_| anyhow!("AVOID_MIN_AREA must be a number of pixels"))?;
        }
        if let Some(value) = env_value("AVOID_CLASSES") {
            let labels = split_csv(&value);
            self.engine.obstacle_classes = parse_classes(labels.iter().map(String::as_str))?;
        }
        if let Some(value) = env_value("AVOID_DEAD_ZONE") {
            self.engine.dead_zone_fraction = value
                .parse()
                .map_err(|_| anyhow!("AVOID_DEAD_ZONE must be a fraction between 0 and 1"))?;
        }
        if let Some(value) = env_value("AVOID_DIRECTION") {
            self.engine.avoidance_direction = value.parse()?;
        }
        if let Some(value) = env_value("AVOID_INTERVAL_MS") {
            let millis: u64 = value.parse().map_err(|_| {
                anyhow!("AVOID_INTERVAL_MS must be an integer number of milliseconds")
            })?;
            self.engine.min_interval = Duration::from_millis(millis);
        }
        if let Some(value) = env_value("AVOID_STEERING_MODE") {
            self.engine.steering_mode = value.parse()?;
        }
        if let Some(value) = env_value("AVOID_ALLOW_UNTRACKED") {
            self.engine.allow_untracked_trigger = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("AVOID_ALLOW_UNTRACKED must be 'true' or 'false'"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.engine.validate().context("invalid avoidance configuration")
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn read_config_file(path: &Path) -> Result<AvoiddConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);
    let cfg: AvoiddConfigFile = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn parse_classes<'a>(labels: impl Iterator<Item = &'a str>) -> Result<Vec<ObjectClass>> {
    let mut classes = Vec::new();
    for label in labels {
        let class: ObjectClass = label.parse()?;
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    Ok(classes)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
