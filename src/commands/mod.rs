//! Command handlers
//!
//! The operations a front end invokes on the recorder.

pub mod session;

pub use session::{FireOutcome, RecorderApp, SharedRecorder};
