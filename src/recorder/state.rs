//! Recording state management
//!
//! Defines the recording state, the in-progress session and the
//! finalized artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current state of the recording controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    #[default]
    Idle,
    /// Currently recording
    Recording,
}

/// Recorder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderConfig {
    /// Filename stem used when a session has no usable label
    pub default_filename: String,

    /// Extension appended to the artifact filename
    pub extension: String,

    /// Container type of the captured chunks
    pub mime_type: String,

    /// How long status messages stay visible
    pub message_ttl_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            default_filename: "hand_detection_video".to_string(),
            extension: "mp4".to_string(),
            mime_type: "video/webm".to_string(),
            message_ttl_ms: 3000,
        }
    }
}

impl RecorderConfig {
    /// Filename for an artifact recorded under `label`.
    pub fn filename_for(&self, label: &str) -> String {
        let stem = match label.trim() {
            "" => self.default_filename.as_str(),
            trimmed => trimmed,
        };
        format!("{}.{}", stem, self.extension)
    }
}

/// An active capture session.
///
/// Owned by the controller while recording, consumed by [`finalize`](Self::finalize).
#[derive(Debug)]
pub struct RecordingSession {
    /// Unique session ID for log correlation
    pub id: Uuid,

    /// Order id / filename the session is filed under
    pub label: String,

    pub is_active: bool,

    /// Captured chunks in arrival order
    pub chunks: Vec<Vec<u8>>,

    pub started_at: DateTime<Utc>,
}

impl RecordingSession {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            is_active: true,
            chunks: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Append a chunk. Empty chunks are ignored.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> bool {
        if !self.is_active || chunk.is_empty() {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    /// Join the chunks into a single artifact, ending the session.
    pub fn finalize(mut self, config: &RecorderConfig) -> RecordingArtifact {
        self.is_active = false;
        let chunk_count = self.chunks.len();
        let bytes = self.chunks.concat();
        RecordingArtifact {
            session_id: self.id,
            filename: config.filename_for(&self.label),
            label: self.label,
            mime_type: config.mime_type.clone(),
            bytes,
            chunk_count,
            started_at: self.started_at,
            stopped_at: Utc::now(),
        }
    }
}

/// A finished recording, ready to be saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingArtifact {
    pub session_id: Uuid,
    pub label: String,
    pub filename: String,
    pub mime_type: String,
    #[serde(skip_serializing)]
    pub bytes: Vec<u8>,
    pub chunk_count: usize,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

impl RecordingArtifact {
    pub fn duration_ms(&self) -> i64 {
        (self.stopped_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_uses_label_or_default() {
        let config = RecorderConfig::default();
        assert_eq!(config.filename_for("order-42"), "order-42.mp4");
        assert_eq!(config.filename_for("  order-42 "), "order-42.mp4");
        assert_eq!(config.filename_for(""), "hand_detection_video.mp4");
        assert_eq!(config.filename_for("   "), "hand_detection_video.mp4");
    }

    #[test]
    fn test_session_skips_empty_chunks() {
        let mut session = RecordingSession::new("a");
        assert!(session.push_chunk(vec![1, 2]));
        assert!(!session.push_chunk(Vec::new()));
        assert!(session.push_chunk(vec![3]));
        assert_eq!(session.chunks.len(), 2);
        assert_eq!(session.chunks.concat(), vec![1, 2, 3]);
    }

    #[test]
    fn test_finalize_concatenates_in_order() {
        let mut session = RecordingSession::new("orderA");
        session.push_chunk(b"ab".to_vec());
        session.push_chunk(b"cd".to_vec());
        let id = session.id;

        let artifact = session.finalize(&RecorderConfig::default());
        assert_eq!(artifact.session_id, id);
        assert_eq!(artifact.bytes, b"abcd");
        assert_eq!(artifact.chunk_count, 2);
        assert_eq!(artifact.filename, "orderA.mp4");
        assert_eq!(artifact.mime_type, "video/webm");
        assert!(artifact.duration_ms() >= 0);
    }

    #[test]
    fn test_artifact_json_omits_bytes() {
        let artifact = RecordingSession::new("x").finalize(&RecorderConfig::default());
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["filename"], "x.mp4");
        assert!(json.get("bytes").is_none());
    }
}
