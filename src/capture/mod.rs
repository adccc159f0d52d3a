//! Keypoint capture
//!
//! The source side of the pipeline: traits for per-frame hand detections
//! and replay implementations of them.

pub mod replay;
pub mod traits;

pub use replay::{JsonlSource, ScriptedSource};
pub use traits::{Frame, KeypointSource, SourceError};
