//! Capture trait definitions
//!
//! The keypoint source is the pose-detection side of the system: once per
//! video frame it reports the hands it found. Sources are unreliable by
//! nature and consumers must survive stale, empty or malformed frames.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::TimestampMs;
use crate::pose::Hand;

/// Keypoint source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Detections for one video frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Capture time. Live sources may leave this unset and let the
    /// detection loop stamp the frame from its clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<TimestampMs>,

    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl Frame {
    pub fn at(timestamp_ms: TimestampMs, hands: Vec<Hand>) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            hands,
        }
    }
}

/// Per-frame hand detections.
#[async_trait]
pub trait KeypointSource: Send {
    /// Resolves once camera and model are ready to produce frames.
    async fn ready(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    /// Next frame of detections, or `None` once the source is exhausted.
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}
