//! Recording channel abstraction
//!
//! A channel is the media stream a session captures from (camera feed or
//! annotated canvas feed). It hands encoded chunks to the controller.

use super::state::RecordingArtifact;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Recording-related errors
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Please enter a filename first")]
    EmptyLabel,

    #[error("Media source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The session was closed but the sink refused the artifact
    #[error("Recording '{}' was not saved: {source}", .artifact.label)]
    Unsaved {
        artifact: Box<RecordingArtifact>,
        #[source]
        source: Box<RecordingError>,
    },
}

impl RecordingError {
    /// Recover the artifact of a recording that could not be saved.
    pub fn into_unsaved(self) -> Option<RecordingArtifact> {
        match self {
            RecordingError::Unsaved { artifact, .. } => Some(*artifact),
            _ => None,
        }
    }
}

pub type RecordingResult<T> = Result<T, RecordingError>;

/// A media stream that can be captured into chunks.
#[async_trait]
pub trait RecordingChannel: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> &str;

    /// Begin producing chunks.
    async fn start(&mut self) -> RecordingResult<()>;

    /// Drain chunks produced since the last call.
    async fn take_chunks(&mut self) -> RecordingResult<Vec<Vec<u8>>>;

    /// Stop producing and flush whatever is still buffered.
    async fn stop(&mut self) -> RecordingResult<Vec<Vec<u8>>>;
}

#[derive(Default)]
struct ChannelBuffer {
    pending: Mutex<Vec<Vec<u8>>>,
    running: AtomicBool,
}

/// In-memory channel fed through a [`ChunkFeeder`].
///
/// Chunks pushed while the channel is stopped are dropped, the same way
/// a media recorder discards data outside an active session.
pub struct MemoryChannel {
    id: String,
    buffer: Arc<ChannelBuffer>,
}

/// Producer half of a [`MemoryChannel`].
#[derive(Clone)]
pub struct ChunkFeeder {
    buffer: Arc<ChannelBuffer>,
}

impl MemoryChannel {
    pub fn new(id: impl Into<String>) -> (Self, ChunkFeeder) {
        let buffer = Arc::new(ChannelBuffer::default());
        let channel = Self {
            id: id.into(),
            buffer: buffer.clone(),
        };
        (channel, ChunkFeeder { buffer })
    }
}

impl ChunkFeeder {
    /// Queue a chunk. Returns false when the channel is not capturing.
    pub fn push(&self, chunk: Vec<u8>) -> bool {
        if !self.buffer.running.load(Ordering::Relaxed) {
            return false;
        }
        self.buffer.pending.lock().push(chunk);
        true
    }

    pub fn is_capturing(&self) -> bool {
        self.buffer.running.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordingChannel for MemoryChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&mut self) -> RecordingResult<()> {
        self.buffer.pending.lock().clear();
        self.buffer.running.store(true, Ordering::Relaxed);
        tracing::debug!("Channel {} capturing", self.id);
        Ok(())
    }

    async fn take_chunks(&mut self) -> RecordingResult<Vec<Vec<u8>>> {
        Ok(std::mem::take(&mut *self.buffer.pending.lock()))
    }

    async fn stop(&mut self) -> RecordingResult<Vec<Vec<u8>>> {
        self.buffer.running.store(false, Ordering::Relaxed);
        let remaining = std::mem::take(&mut *self.buffer.pending.lock());
        tracing::debug!("Channel {} stopped, {} chunks flushed", self.id, remaining.len());
        Ok(remaining)
    }
}
