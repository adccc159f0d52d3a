//! Recording controller
//!
//! Owns the capture session lifecycle: starting a session from a media
//! channel, collecting chunks, and finalizing them into an artifact that
//! is handed to the sink.

use super::channel::{RecordingChannel, RecordingError, RecordingResult};
use super::notice::{
    Notice, NoticeLevel, StatusBoard, EMPTY_LABEL_MESSAGE, SAVE_FAILED_MESSAGE, STARTED_MESSAGE,
    STOPPED_MESSAGE,
};
use super::sink::ArtifactSink;
use super::state::{RecorderConfig, RecordingArtifact, RecordingSession, RecordingState};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted during recording
#[derive(Debug, Clone)]
pub enum RecordingEvent {
    /// Recording started
    Started { session_id: Uuid, label: String },
    /// Recording stopped and the artifact was delivered
    Stopped {
        session_id: Uuid,
        label: String,
        filename: String,
        bytes: usize,
    },
    /// User-facing warning (e.g. missing label)
    Warning(String),
    /// Error occurred
    Error(String),
}

pub struct RecordingController {
    /// Current recording state
    state: Arc<RwLock<RecordingState>>,

    config: RecorderConfig,

    /// Media stream to capture from, attached by the application
    channel: Option<Box<dyn RecordingChannel>>,

    /// Where finished artifacts go
    sink: Box<dyn ArtifactSink>,

    /// The session in progress, if any
    session: Option<RecordingSession>,

    /// Artifacts the sink refused while a new session was being started
    unsaved: Vec<RecordingArtifact>,

    status: StatusBoard,

    /// Event broadcaster
    event_tx: broadcast::Sender<RecordingEvent>,
}

impl RecordingController {
    pub fn new(config: RecorderConfig, sink: Box<dyn ArtifactSink>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(RecordingState::Idle)),
            status: StatusBoard::new(config.message_ttl_ms),
            config,
            channel: None,
            sink,
            session: None,
            unsaved: Vec::new(),
            event_tx,
        }
    }

    /// Attach the media stream sessions capture from.
    ///
    /// Replacing the channel while recording stops the current session first.
    pub async fn attach_channel(
        &mut self,
        channel: Box<dyn RecordingChannel>,
    ) -> RecordingResult<Option<RecordingArtifact>> {
        let finished = self.stop_or_queue().await?;
        tracing::info!("Attaching channel: {}", channel.id());
        self.channel = Some(channel);
        Ok(finished)
    }

    pub fn state(&self) -> RecordingState {
        *self.state.read()
    }

    /// Shared read-only view of the state for renderers.
    pub fn state_handle(&self) -> Arc<RwLock<RecordingState>> {
        self.state.clone()
    }

    pub fn is_recording(&self) -> bool {
        self.state() == RecordingState::Recording
    }

    /// Label of the active session.
    pub fn current_label(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.label.as_str())
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn status(&self) -> Option<&Notice> {
        self.status.current()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.event_tx.subscribe()
    }

    /// Recordings that were closed by a restart but could not be saved.
    pub fn unsaved(&self) -> &[RecordingArtifact] {
        &self.unsaved
    }

    /// Hand the unsaved recordings to the caller.
    pub fn take_unsaved(&mut self) -> Vec<RecordingArtifact> {
        std::mem::take(&mut self.unsaved)
    }

    /// Offer unsaved recordings to the sink again. Returns how many were saved;
    /// the rest stay queued.
    pub async fn retry_unsaved(&mut self) -> usize {
        let mut saved = 0;
        for artifact in std::mem::take(&mut self.unsaved) {
            match self.sink.save(&artifact).await {
                Ok(()) => {
                    tracing::info!("Saved previously failed recording '{}'", artifact.label);
                    saved += 1;
                }
                Err(e) => {
                    tracing::warn!("Recording '{}' still not saved: {}", artifact.label, e);
                    self.unsaved.push(artifact);
                }
            }
        }
        saved
    }

    /// Start a session under `label`.
    ///
    /// A blank label is refused with a warning and leaves any current
    /// session untouched. If a session is already running it is stopped
    /// and delivered under its old label first; that artifact is returned.
    /// When the sink refuses the old artifact the new session still starts
    /// and the old one is kept in [`unsaved`](Self::unsaved).
    pub async fn start(&mut self, label: &str) -> RecordingResult<Option<RecordingArtifact>> {
        let label = label.trim();
        if label.is_empty() {
            tracing::warn!("Refusing to start recording without a label");
            self.status.post(EMPTY_LABEL_MESSAGE, NoticeLevel::Warning);
            let _ = self
                .event_tx
                .send(RecordingEvent::Warning(EMPTY_LABEL_MESSAGE.to_string()));
            return Err(RecordingError::EmptyLabel);
        }

        if self.channel.is_none() {
            return Err(RecordingError::SourceUnavailable(
                "no media channel attached".to_string(),
            ));
        }

        let previous = self.stop_or_queue().await?;

        let channel = self
            .channel
            .as_mut()
            .ok_or_else(|| RecordingError::SourceUnavailable("channel detached".to_string()))?;
        channel.start().await?;

        let session = RecordingSession::new(label);
        tracing::info!(
            "Recording '{}' started (session {}, channel {})",
            label,
            session.id,
            channel.id()
        );

        let _ = self.event_tx.send(RecordingEvent::Started {
            session_id: session.id,
            label: session.label.clone(),
        });
        self.session = Some(session);
        *self.state.write() = RecordingState::Recording;
        self.status.post(STARTED_MESSAGE, NoticeLevel::Info);

        Ok(previous)
    }

    /// Stop the active session and deliver its artifact.
    ///
    /// Returns `Ok(None)` when nothing is recording.
    pub async fn stop(&mut self) -> RecordingResult<Option<RecordingArtifact>> {
        let Some(mut session) = self.session.take() else {
            return Ok(None);
        };

        tracing::info!("Stopping recording '{}'", session.label);

        if let Some(channel) = self.channel.as_mut() {
            match channel.stop().await {
                Ok(chunks) => {
                    for chunk in chunks {
                        session.push_chunk(chunk);
                    }
                }
                Err(e) => {
                    // Keep what was already captured
                    tracing::warn!("Channel {} failed to flush: {}", channel.id(), e);
                }
            }
        }

        *self.state.write() = RecordingState::Idle;
        let artifact = session.finalize(&self.config);
        self.status.post(STOPPED_MESSAGE, NoticeLevel::Info);

        if let Err(e) = self.sink.save(&artifact).await {
            tracing::error!("Failed to save recording '{}': {}", artifact.label, e);
            self.status.post(SAVE_FAILED_MESSAGE, NoticeLevel::Error);
            let _ = self.event_tx.send(RecordingEvent::Error(e.to_string()));
            return Err(RecordingError::Unsaved {
                artifact: Box::new(artifact),
                source: Box::new(e),
            });
        }

        let _ = self.event_tx.send(RecordingEvent::Stopped {
            session_id: artifact.session_id,
            label: artifact.label.clone(),
            filename: artifact.filename.clone(),
            bytes: artifact.bytes.len(),
        });

        tracing::info!(
            "Recording stopped. {} ({} bytes, {}ms)",
            artifact.filename,
            artifact.bytes.len(),
            artifact.duration_ms()
        );
        Ok(Some(artifact))
    }

    /// Like [`stop`](Self::stop), but a sink failure is absorbed: the
    /// artifact is queued as unsaved and `None` is returned.
    pub async fn stop_or_queue(&mut self) -> RecordingResult<Option<RecordingArtifact>> {
        match self.stop().await {
            Err(RecordingError::Unsaved { artifact, source }) => {
                tracing::warn!(
                    "Keeping unsaved recording '{}' ({}), continuing",
                    artifact.label,
                    source
                );
                self.unsaved.push(*artifact);
                Ok(None)
            }
            other => other,
        }
    }

    /// Append a chunk to the active session. Ignored when idle or empty.
    pub fn append_chunk(&mut self, chunk: Vec<u8>) -> bool {
        match self.session.as_mut() {
            Some(session) => session.push_chunk(chunk),
            None => false,
        }
    }

    /// Move any chunks the channel has buffered into the session.
    pub async fn pump(&mut self) -> RecordingResult<usize> {
        if self.session.is_none() {
            return Ok(0);
        }
        let Some(channel) = self.channel.as_mut() else {
            return Ok(0);
        };
        let chunks = channel.take_chunks().await?;
        let mut appended = 0;
        for chunk in chunks {
            if self.append_chunk(chunk) {
                appended += 1;
            }
        }
        Ok(appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::channel::{ChunkFeeder, MemoryChannel};
    use crate::recorder::sink::MemorySink;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Sink that refuses artifacts while `failing` is set.
    #[derive(Clone, Default)]
    struct FlakySink {
        failing: Arc<AtomicBool>,
        inner: MemorySink,
    }

    #[async_trait]
    impl ArtifactSink for FlakySink {
        async fn save(&mut self, artifact: &RecordingArtifact) -> RecordingResult<()> {
            if self.failing.load(Ordering::Relaxed) {
                return Err(RecordingError::Sink("disk full".to_string()));
            }
            self.inner.save(artifact).await
        }
    }

    async fn flaky_controller() -> (RecordingController, ChunkFeeder, FlakySink) {
        let sink = FlakySink::default();
        let mut controller =
            RecordingController::new(RecorderConfig::default(), Box::new(sink.clone()));
        let (channel, feeder) = MemoryChannel::new("camera");
        controller.attach_channel(Box::new(channel)).await.unwrap();
        (controller, feeder, sink)
    }

    async fn controller() -> (RecordingController, ChunkFeeder, MemorySink) {
        let sink = MemorySink::new();
        let mut controller =
            RecordingController::new(RecorderConfig::default(), Box::new(sink.clone()));
        let (channel, feeder) = MemoryChannel::new("camera");
        controller.attach_channel(Box::new(channel)).await.unwrap();
        (controller, feeder, sink)
    }

    #[tokio::test]
    async fn test_blank_label_refused() {
        let (mut controller, _feeder, sink) = controller().await;
        let mut events = controller.subscribe();

        for label in ["", "   "] {
            let err = controller.start(label).await.unwrap_err();
            assert!(matches!(err, RecordingError::EmptyLabel));
            assert!(!controller.is_recording());
            assert!(controller.current_label().is_none());
        }

        let notice = controller.status().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.text, EMPTY_LABEL_MESSAGE);
        assert!(matches!(events.try_recv().unwrap(), RecordingEvent::Warning(_)));
        assert!(sink.artifacts().is_empty());
    }

    #[tokio::test]
    async fn test_blank_label_leaves_active_session_alone() {
        let (mut controller, _feeder, sink) = controller().await;
        controller.start("orderA").await.unwrap();
        assert!(controller.start(" ").await.is_err());
        assert_eq!(controller.current_label(), Some("orderA"));
        assert!(sink.artifacts().is_empty());
    }

    #[tokio::test]
    async fn test_start_without_channel_is_unavailable() {
        let mut controller =
            RecordingController::new(RecorderConfig::default(), Box::new(MemorySink::new()));
        let err = controller.start("orderA").await.unwrap_err();
        assert!(matches!(err, RecordingError::SourceUnavailable(_)));
        assert_eq!(controller.state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_start_stop_produces_artifact() {
        let (mut controller, feeder, sink) = controller().await;
        let mut events = controller.subscribe();

        assert!(controller.start("  order-1 ").await.unwrap().is_none());
        assert!(controller.is_recording());
        assert_eq!(controller.current_label(), Some("order-1"));
        assert_eq!(controller.status().unwrap().text, STARTED_MESSAGE);

        feeder.push(b"one".to_vec());
        assert_eq!(controller.pump().await.unwrap(), 1);
        feeder.push(Vec::new());
        feeder.push(b"two".to_vec());

        let artifact = controller.stop().await.unwrap().unwrap();
        assert_eq!(artifact.label, "order-1");
        assert_eq!(artifact.filename, "order-1.mp4");
        assert_eq!(artifact.bytes, b"onetwo");
        assert_eq!(artifact.chunk_count, 2);
        assert!(!controller.is_recording());
        assert_eq!(controller.status().unwrap().text, STOPPED_MESSAGE);
        assert_eq!(sink.labels(), vec!["order-1"]);

        assert!(matches!(events.try_recv().unwrap(), RecordingEvent::Started { .. }));
        match events.try_recv().unwrap() {
            RecordingEvent::Stopped { filename, bytes, .. } => {
                assert_eq!(filename, "order-1.mp4");
                assert_eq!(bytes, 6);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let (mut controller, _feeder, sink) = controller().await;
        assert!(controller.stop().await.unwrap().is_none());
        assert!(controller.stop().await.unwrap().is_none());
        assert!(sink.artifacts().is_empty());
    }

    #[tokio::test]
    async fn test_restart_finalizes_previous_label_first() {
        let (mut controller, feeder, sink) = controller().await;

        controller.start("orderA").await.unwrap();
        feeder.push(b"A".to_vec());

        let previous = controller.start("orderB").await.unwrap().unwrap();
        assert_eq!(previous.label, "orderA");
        assert_eq!(previous.bytes, b"A");
        assert_eq!(sink.labels(), vec!["orderA"]);
        assert_eq!(controller.current_label(), Some("orderB"));

        feeder.push(b"B".to_vec());
        let last = controller.stop().await.unwrap().unwrap();
        assert_eq!(last.label, "orderB");
        assert_eq!(last.bytes, b"B");
        assert_eq!(sink.labels(), vec!["orderA", "orderB"]);
    }

    #[tokio::test]
    async fn test_append_chunk_ignored_when_idle() {
        let (mut controller, _feeder, _sink) = controller().await;
        assert!(!controller.append_chunk(vec![1]));
        controller.start("x").await.unwrap();
        assert!(controller.append_chunk(vec![1]));
        assert!(!controller.append_chunk(Vec::new()));
    }

    #[tokio::test]
    async fn test_state_handle_tracks_controller() {
        let (mut controller, _feeder, _sink) = controller().await;
        let handle = controller.state_handle();
        controller.start("x").await.unwrap();
        assert_eq!(*handle.read(), RecordingState::Recording);
        controller.stop().await.unwrap();
        assert_eq!(*handle.read(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_stop_with_failing_sink_returns_artifact() {
        let (mut controller, feeder, sink) = flaky_controller().await;
        let mut events = controller.subscribe();
        sink.failing.store(true, Ordering::Relaxed);

        controller.start("orderA").await.unwrap();
        feeder.push(b"kept".to_vec());

        let err = controller.stop().await.unwrap_err();
        assert!(matches!(events.try_recv().unwrap(), RecordingEvent::Started { .. }));
        assert!(matches!(events.try_recv().unwrap(), RecordingEvent::Error(_)));
        assert_eq!(controller.state(), RecordingState::Idle);
        assert_eq!(controller.status().unwrap().level, NoticeLevel::Error);

        let artifact = err.into_unsaved().unwrap();
        assert_eq!(artifact.label, "orderA");
        assert_eq!(artifact.bytes, b"kept");
    }

    #[tokio::test]
    async fn test_restart_with_failing_sink_keeps_old_and_starts_new() {
        let (mut controller, feeder, sink) = flaky_controller().await;
        controller.start("orderA").await.unwrap();
        feeder.push(b"precious".to_vec());

        sink.failing.store(true, Ordering::Relaxed);
        assert!(controller.start("orderB").await.unwrap().is_none());
        assert!(controller.is_recording());
        assert_eq!(controller.current_label(), Some("orderB"));
        assert_eq!(controller.unsaved().len(), 1);
        assert_eq!(controller.unsaved()[0].bytes, b"precious");

        // Still failing: stays queued
        assert_eq!(controller.retry_unsaved().await, 0);
        assert_eq!(controller.unsaved().len(), 1);

        sink.failing.store(false, Ordering::Relaxed);
        assert_eq!(controller.retry_unsaved().await, 1);
        assert!(controller.unsaved().is_empty());
        assert_eq!(sink.inner.labels(), vec!["orderA"]);
    }

    #[tokio::test]
    async fn test_take_unsaved_drains_queue() {
        let (mut controller, _feeder, sink) = flaky_controller().await;
        controller.start("orderA").await.unwrap();
        sink.failing.store(true, Ordering::Relaxed);
        controller.start("orderB").await.unwrap();

        let unsaved = controller.take_unsaved();
        assert_eq!(unsaved.len(), 1);
        assert_eq!(unsaved[0].label, "orderA");
        assert!(controller.unsaved().is_empty());
    }
}
