//! Gesture Recorder - webcam recording triggered by a held open hand.
//!
//! Per-frame hand keypoints are classified as open or not, a timing-gated
//! trigger turns a one-second open-hand hold into a fire event, and fire
//! events toggle a recording session filed under the current order id.

pub mod capture;
pub mod commands;
pub mod config;
pub mod gesture;
pub mod overlay;
pub mod pipeline;
pub mod pose;
pub mod recorder;
pub mod utils;

use std::path::Path;
use std::sync::atomic::Ordering;

use capture::JsonlSource;
use commands::RecorderApp;
use config::AppConfig;
use pipeline::{DetectionLoop, LoopSummary};
use recorder::{DirectorySink, MemoryChannel, RecordingController};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::AppResult;

/// Initialize tracing/logging
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Replay a JSON-lines keypoint capture through the full pipeline.
///
/// Each recording holds the frames seen while it was active, one JSON
/// line per frame, and is written under `config.output_dir`.
pub async fn run_replay(
    config: AppConfig,
    frames_path: &Path,
    order_id: Option<&str>,
    realtime: bool,
) -> AppResult<LoopSummary> {
    tracing::info!("Starting Gesture Recorder v{}", env!("CARGO_PKG_VERSION"));

    let sink = DirectorySink::new(&config.output_dir);
    let mut controller = RecordingController::new(config.recorder.clone(), Box::new(sink));
    let (channel, feeder) = MemoryChannel::new("keypoint-replay");
    controller.attach_channel(Box::new(channel)).await?;

    let app = RecorderApp::new(controller).shared();
    if let Some(order_id) = order_id {
        app.lock().await.submit_order_id(order_id).await?;
    }

    let detection = DetectionLoop::new(config.gesture.clone(), app.clone()).with_frame_tap(feeder);
    let cancel = detection.cancel_handle();
    let source = JsonlSource::new(frames_path).realtime(realtime);
    let mut handle = detection.spawn(Box::new(source));

    let summary = tokio::select! {
        joined = &mut handle => joined,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, tearing down detection loop");
            cancel.store(true, Ordering::Relaxed);
            handle.await
        }
    }
    .map_err(|e| utils::AppError::Task(e.to_string()))??;

    // Close out whatever is still recording
    let mut app = app.lock().await;
    if let Some(artifact) = app.stop_and_download().await? {
        tracing::info!("Final recording saved as {}", artifact.filename);
    }

    let controller = app.controller_mut();
    if !controller.unsaved().is_empty() {
        controller.retry_unsaved().await;
        for artifact in controller.unsaved() {
            tracing::warn!("Recording '{}' was never saved", artifact.label);
        }
    }

    Ok(summary)
}
