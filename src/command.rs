//! Steering command vocabulary.
//!
//! Commands are a closed enum inside the kernel. The single-byte ASCII encoding
//! exists only at the transport boundary (`Command::as_byte`).

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Steering intent produced once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Straighten the wheels / stop turning.
    Center,
    TurnLeft,
    TurnRight,
    /// Obstacle dead ahead; only emitted by the reactive steering mode.
    Stop,
}

impl Command {
    /// Wire encoding: one ASCII byte per datagram.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Center => b'C',
            Self::TurnLeft => b'L',
            Self::TurnRight => b'R',
            Self::Stop => b'S',
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'C' => Some(Self::Center),
            b'L' => Some(Self::TurnLeft),
            b'R' => Some(Self::TurnRight),
            b'S' => Some(Self::Stop),
            _ => None,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

/// Direction the vehicle turns while a maneuver is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvoidanceDirection {
    #[default]
    Left,
    Right,
}

impl AvoidanceDirection {
    pub fn command(self) -> Command {
        match self {
            Self::Left => Command::TurnLeft,
            Self::Right => Command::TurnRight,
        }
    }
}

impl FromStr for AvoidanceDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            other => Err(anyhow!(
                "unknown avoidance direction '{}': expected 'L' or 'R'",
                other
            )),
        }
    }
}

/// How the state machine turns the selected obstacle into an intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringMode {
    /// Two-state hysteresis machine keyed on the tracker's identifiers.
    #[default]
    Tracking,
    /// Stateless: steer away from whichever side the obstacle sits on, stop
    /// when it is dead ahead.
    Reactive,
}

impl FromStr for SteeringMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tracking" | "tracked" => Ok(Self::Tracking),
            "reactive" | "stateless" => Ok(Self::Reactive),
            other => Err(anyhow!(
                "unknown steering mode '{}': expected 'tracking' or 'reactive'",
                other
            )),
        }
    }
}

impl std::fmt::Display for SteeringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tracking => write!(f, "tracking"),
            Self::Reactive => write!(f, "reactive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes_match_actuator_protocol() {
        assert_eq!(Command::Center.as_byte(), b'C');
        assert_eq!(Command::TurnLeft.as_byte(), b'L');
        assert_eq!(Command::TurnRight.as_byte(), b'R');
        assert_eq!(Command::Stop.as_byte(), b'S');
        assert_eq!(Command::from_byte(b'L'), Some(Command::TurnLeft));
        assert_eq!(Command::from_byte(b'x'), None);
        assert_eq!(Command::TurnRight.to_string(), "R");
    }

    #[test]
    fn direction_from_str() {
        assert_eq!(
            "L".parse::<AvoidanceDirection>().unwrap(),
            AvoidanceDirection::Left
        );
        assert_eq!(
            "right".parse::<AvoidanceDirection>().unwrap(),
            AvoidanceDirection::Right
        );
        assert!("up".parse::<AvoidanceDirection>().is_err());
        assert_eq!(AvoidanceDirection::Right.command(), Command::TurnRight);
    }

    #[test]
    fn steering_mode_from_str() {
        assert_eq!(
            "REACTIVE".parse::<SteeringMode>().unwrap(),
            SteeringMode::Reactive
        );
        assert_eq!(
            "tracking".parse::<SteeringMode>().unwrap(),
            SteeringMode::Tracking
        );
        assert!("".parse::<SteeringMode>().is_err());
    }
}
