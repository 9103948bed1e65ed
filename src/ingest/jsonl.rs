//! JSON-lines tracker feed.
//!
//! One frame per line:
//!
//! ```json
//! {"frame_width":640,"detections":[{"box":[l,t,r,b],"label":"person","confidence":0.9,"track_id":7}]}
//! ```
//!
//! `track_id` may be omitted or null. Labels outside the vocabulary become
//! `unknown`. Blank lines are skipped.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{DetectionFrame, DetectionSource};
use crate::detect::{BoundingBox, Detection, ObjectClass};

#[derive(Debug, Deserialize)]
struct FrameRecord {
    frame_width: u32,
    #[serde(default)]
    detections: Vec<DetectionRecord>,
}

#[derive(Debug, Deserialize)]
struct DetectionRecord {
    #[serde(rename = "box")]
    bbox: [f32; 4],
    label: String,
    confidence: f32,
    #[serde(default)]
    track_id: Option<u64>,
}

impl From<DetectionRecord> for Detection {
    fn from(record: DetectionRecord) -> Self {
        let [left, top, right, bottom] = record.bbox;
        Detection {
            bbox: BoundingBox::new(left, top, right, bottom),
            class: ObjectClass::from_label(&record.label),
            confidence: record.confidence,
            track_id: record.track_id,
        }
    }
}

/// Parse a single feed line.
pub fn parse_frame_line(line: &str) -> Result<DetectionFrame> {
    let record: FrameRecord = serde_json::from_str(line).map_err(|e| anyhow!("{}", e))?;
    if record.frame_width == 0 {
        return Err(anyhow!("frame_width must be greater than zero"));
    }
    Ok(DetectionFrame {
        frame_width: record.frame_width,
        detections: record.detections.into_iter().map(Detection::from).collect(),
    })
}

pub struct JsonLinesSource {
    name: String,
    reader: Box<dyn BufRead + Send>,
    line_no: u64,
    frames: u64,
}

impl JsonLinesSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("open detection feed {}", path.display()))?;
        Ok(Self::from_reader(
            path.display().to_string(),
            BufReader::new(file),
        ))
    }

    pub fn stdin() -> Self {
        Self::from_reader("stdin".to_string(), BufReader::new(std::io::stdin()))
    }

    pub fn from_reader(name: String, reader: impl BufRead + Send + 'static) -> Self {
        Self {
            name,
            reader: Box::new(reader),
            line_no: 0,
            frames: 0,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames
    }
}

impl DetectionSource for JsonLinesSource {
    fn describe(&self) -> String {
        format!("jsonl:{}", self.name)
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("read detection feed {}", self.name))?;
            if read == 0 {
                log::info!(
                    "detection feed {} ended after {} frames",
                    self.name,
                    self.frames
                );
                return Ok(None);
            }
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let frame = parse_frame_line(line.trim()).with_context(|| {
                format!("invalid frame at {} line {}", self.name, self.line_no)
            })?;
            self.frames += 1;
            return Ok(Some(frame));
        }
    }
}
