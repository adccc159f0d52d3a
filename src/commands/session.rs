//! Order-id recording commands
//!
//! The operations a UI exposes: submit an order id (which files the
//! recording under that id), stop & download, and the gesture toggle.

use crate::gesture::FireEvent;
use crate::recorder::{
    RecordingArtifact, RecordingController, RecordingError, RecordingResult, RecordingState,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle for UI tasks and the detection loop
pub type SharedRecorder = Arc<Mutex<RecorderApp>>;

/// What a gesture fire did.
#[derive(Debug)]
pub enum FireOutcome {
    /// A session started under this label
    Started(String),
    /// The running session stopped
    Stopped(Option<RecordingArtifact>),
    /// No order id to record under; a warning was posted
    Refused,
}

pub struct RecorderApp {
    controller: RecordingController,

    /// Order id the current (or next) recording is filed under
    order_id: Option<String>,
}

impl RecorderApp {
    pub fn new(controller: RecordingController) -> Self {
        Self {
            controller,
            order_id: None,
        }
    }

    pub fn shared(self) -> SharedRecorder {
        Arc::new(Mutex::new(self))
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn is_recording(&self) -> bool {
        self.controller.state() == RecordingState::Recording
    }

    pub fn controller(&self) -> &RecordingController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RecordingController {
        &mut self.controller
    }

    /// Text of the visible status message, if any.
    pub fn status_text(&self) -> Option<String> {
        self.controller.status().map(|n| n.text.clone())
    }

    /// Switch recording to a new order id.
    ///
    /// A running recording is closed out under its old id first and
    /// returned. Blank input is ignored. The order id only changes once
    /// recording under it has started.
    pub async fn submit_order_id(
        &mut self,
        text: &str,
    ) -> RecordingResult<Option<RecordingArtifact>> {
        let order_id = text.trim();
        if order_id.is_empty() {
            return Ok(None);
        }

        tracing::info!("Order id submitted: {}", order_id);
        let previous = self.controller.start(order_id).await?;
        self.order_id = Some(order_id.to_string());
        Ok(previous)
    }

    /// Stop the running recording (if any) and forget the order id.
    pub async fn stop_and_download(&mut self) -> RecordingResult<Option<RecordingArtifact>> {
        self.order_id = None;
        self.controller.stop().await
    }

    /// Toggle recording in response to a gesture.
    pub async fn handle_fire(&mut self, event: FireEvent) -> RecordingResult<FireOutcome> {
        if self.is_recording() {
            tracing::info!("Gesture at {}ms: stopping recording", event.at);
            let artifact = self.controller.stop_or_queue().await?;
            return Ok(FireOutcome::Stopped(artifact));
        }

        let label = self.order_id.clone().unwrap_or_default();
        match self.controller.start(&label).await {
            Ok(_) => {
                tracing::info!("Gesture at {}ms: recording '{}'", event.at, label);
                Ok(FireOutcome::Started(label))
            }
            Err(RecordingError::EmptyLabel) => Ok(FireOutcome::Refused),
            Err(e) => Err(e),
        }
    }
}
