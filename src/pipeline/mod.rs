//! Detection pipeline
//!
//! Drives keypoint frames through the gesture trigger into the recorder.

pub mod clock;
pub mod detection;

pub use clock::{Clock, SystemClock};
pub use detection::{DetectionLoop, LoopSummary};
