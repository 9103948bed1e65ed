//! Detection sources.
//!
//! The detector and tracker run outside the kernel. A source adapts their
//! output into one `DetectionFrame` per cycle:
//! - JSON lines from a file or stdin (an external tracker process)
//! - Scripted synthetic scenes (`stub://`), for demos and tests
//!
//! `Ok(None)` from `next_frame` means the feed is exhausted; the processing
//! loop then stops and sends the safing command.

pub mod jsonl;
#[cfg(feature = "stub-detection-source")]
pub mod stub;

use anyhow::{anyhow, Result};

use crate::detect::Detection;

pub use jsonl::JsonLinesSource;
#[cfg(feature = "stub-detection-source")]
pub use stub::{StubScenario, StubSource};

/// Tracker output for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionFrame {
    pub frame_width: u32,
    pub detections: Vec<Detection>,
}

/// Supplier of per-frame detections.
pub trait DetectionSource {
    /// Source identifier for logs.
    fn describe(&self) -> String;

    /// Next frame, or `None` when the feed has ended.
    fn next_frame(&mut self) -> Result<Option<DetectionFrame>>;
}

impl<T: DetectionSource + ?Sized> DetectionSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn next_frame(&mut self) -> Result<Option<DetectionFrame>> {
        (**self).next_frame()
    }
}

/// Open a source from a locator: `stub://<scenario>`, `-` for stdin, or a
/// local file path.
pub fn open_source(locator: &str) -> Result<Box<dyn DetectionSource>> {
    let locator = locator.trim();
    if locator.is_empty() {
        return Err(anyhow!("detection source must not be empty"));
    }
    if let Some(scenario) = locator.strip_prefix("stub://") {
        #[cfg(feature = "stub-detection-source")]
        {
            let scenario: StubScenario = scenario.parse()?;
            return Ok(Box::new(StubSource::new(scenario)));
        }
        #[cfg(not(feature = "stub-detection-source"))]
        {
            return Err(anyhow!(
                "stub source '{}' requires the stub-detection-source feature",
                scenario
            ));
        }
    }
    if locator == "-" {
        return Ok(Box::new(JsonLinesSource::stdin()));
    }
    if locator.contains("://") {
        return Err(anyhow!(
            "unsupported detection source '{}': expected stub://<scenario>, '-' or a local path",
            locator
        ));
    }
    Ok(Box::new(JsonLinesSource::open(locator)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_remote_and_empty_locators() {
        assert!(open_source("").is_err());
        assert!(open_source("rtsp://camera/stream").is_err());
        assert!(open_source("/nonexistent/detections.jsonl").is_err());
    }

    #[test]
    #[cfg(feature = "stub-detection-source")]
    fn opens_stub_scenarios() {
        let mut source = open_source("stub://crossing").unwrap();
        assert!(source.describe().contains("crossing"));
        assert!(source.next_frame().unwrap().is_some());
        assert!(open_source("stub://nope").is_err());
    }
}
