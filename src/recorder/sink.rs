//! Artifact sinks
//!
//! The save/download side of a recording. The controller never touches
//! the filesystem itself; it hands each finished artifact to a sink.

use super::channel::{RecordingError, RecordingResult};
use super::state::RecordingArtifact;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persist or deliver one artifact under its suggested filename.
    async fn save(&mut self, artifact: &RecordingArtifact) -> RecordingResult<()>;
}

/// Writes artifacts into a directory, one file per recording.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path an artifact will be written to.
    pub fn path_for(&self, artifact: &RecordingArtifact) -> RecordingResult<PathBuf> {
        // Labels are user text; keep the file inside the target directory
        let name = Path::new(&artifact.filename)
            .file_name()
            .ok_or_else(|| RecordingError::Sink(format!("Invalid filename: {}", artifact.filename)))?;
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&mut self, artifact: &RecordingArtifact) -> RecordingResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(artifact)?;
        tokio::fs::write(&path, &artifact.bytes).await?;

        tracing::info!(
            "Saved recording '{}' ({} bytes, {} chunks) to {:?}",
            artifact.label,
            artifact.bytes.len(),
            artifact.chunk_count,
            path
        );
        Ok(())
    }
}

/// Keeps artifacts in memory. Clones share the same store.
#[derive(Clone, Default)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<RecordingArtifact>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> Vec<RecordingArtifact> {
        self.saved.lock().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.saved.lock().iter().map(|a| a.label.clone()).collect()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn save(&mut self, artifact: &RecordingArtifact) -> RecordingResult<()> {
        self.saved.lock().push(artifact.clone());
        Ok(())
    }
}
