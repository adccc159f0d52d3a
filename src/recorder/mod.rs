//! Recording system module
//!
//! - RecordingChannel trait for the captured media stream
//! - RecordingController for the session lifecycle
//! - ArtifactSink for delivering finished recordings
//! - StatusBoard for transient user-visible messages

pub mod channel;
pub mod controller;
pub mod notice;
pub mod sink;
pub mod state;

pub use channel::{ChunkFeeder, MemoryChannel, RecordingChannel, RecordingError, RecordingResult};
pub use controller::{RecordingController, RecordingEvent};
pub use notice::{Notice, NoticeLevel, StatusBoard};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
pub use state::{RecorderConfig, RecordingArtifact, RecordingSession, RecordingState};
