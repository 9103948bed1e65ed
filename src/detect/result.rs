use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Axis-aligned box in frame-pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    /// Projected area in pixels². Inverted boxes have zero area.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}

/// One object observation for one frame, as reported by the upstream tracker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class: ObjectClass,
    pub confidence: f32,
    /// Absent when the tracker did not assign an identifier this frame.
    pub track_id: Option<u64>,
}

/// Closed label vocabulary shared with the tracker.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    Person,
    Bicycle,
    Car,
    Motorcycle,
    Bus,
    Train,
    Truck,
    Chair,
    Dog,
    Cat,
    PottedPlant,
    /// Any label outside the vocabulary.
    Unknown,
}

const KNOWN_CLASSES: &[ObjectClass] = &[
    ObjectClass::Person,
    ObjectClass::Bicycle,
    ObjectClass::Car,
    ObjectClass::Motorcycle,
    ObjectClass::Bus,
    ObjectClass::Train,
    ObjectClass::Truck,
    ObjectClass::Chair,
    ObjectClass::Dog,
    ObjectClass::Cat,
    ObjectClass::PottedPlant,
];

impl ObjectClass {
    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Bicycle => "bicycle",
            Self::Car => "car",
            Self::Motorcycle => "motorcycle",
            Self::Bus => "bus",
            Self::Train => "train",
            Self::Truck => "truck",
            Self::Chair => "chair",
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::PottedPlant => "potted plant",
            Self::Unknown => "unknown",
        }
    }

    /// Lenient mapping used for tracker output: labels outside the
    /// vocabulary become `Unknown` rather than failing the frame.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Unknown)
    }
}

impl FromStr for ObjectClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        KNOWN_CLASSES
            .iter()
            .copied()
            .find(|class| class.label() == normalized)
            .ok_or_else(|| anyhow!("unknown object class '{}'", s.trim()))
    }
}

impl std::fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_geometry() {
        let bbox = BoundingBox::new(100.0, 50.0, 200.0, 150.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.area(), 10_000.0);
        assert_eq!(bbox.center_x(), 150.0);
    }

    #[test]
    fn inverted_box_has_zero_area() {
        let bbox = BoundingBox::new(200.0, 50.0, 100.0, 150.0);
        assert_eq!(bbox.area(), 0.0);
    }

    #[test]
    fn class_labels_parse_leniently() {
        assert_eq!("Person".parse::<ObjectClass>().unwrap(), ObjectClass::Person);
        assert_eq!(
            "potted_plant".parse::<ObjectClass>().unwrap(),
            ObjectClass::PottedPlant
        );
        assert!("toaster".parse::<ObjectClass>().is_err());
        assert!("unknown".parse::<ObjectClass>().is_err());
        assert_eq!(ObjectClass::from_label("toaster"), ObjectClass::Unknown);
    }
}
