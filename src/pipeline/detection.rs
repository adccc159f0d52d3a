//! Detection loop
//!
//! Pulls frames from a keypoint source, runs them through the gesture
//! trigger, forwards fire events to the recorder and publishes an overlay
//! snapshot per frame. One frame is processed at a time, so the trigger
//! is never stepped concurrently.

use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::clock::{Clock, SystemClock};
use crate::capture::{Frame, KeypointSource};
use crate::commands::SharedRecorder;
use crate::gesture::{GestureConfig, GestureState, GestureTrigger};
use crate::overlay::{OverlayFrame, OverlayInput};
use crate::recorder::ChunkFeeder;
use crate::utils::AppResult;

/// Consecutive failed reads after which the source is given up on.
pub const DEFAULT_FAILURE_LIMIT: u32 = 30;

/// Pause per consecutive failure, capped at ten steps.
const FAILURE_BACKOFF_MS: u64 = 5;

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Frames run through the trigger
    pub frames: u64,
    /// Fire events emitted
    pub fires: u64,
    /// Source reads that failed and were skipped
    pub skipped: u64,
}

pub struct DetectionLoop {
    trigger: GestureTrigger,
    app: SharedRecorder,
    clock: Box<dyn Clock>,
    cancel_flag: Arc<AtomicBool>,
    overlay_tx: watch::Sender<Option<OverlayFrame>>,
    frame_tap: Option<ChunkFeeder>,
    failure_limit: u32,
}

impl DetectionLoop {
    pub fn new(config: GestureConfig, app: SharedRecorder) -> Self {
        let (overlay_tx, _) = watch::channel(None);
        Self {
            trigger: GestureTrigger::new(config),
            app,
            clock: Box::new(SystemClock::new()),
            cancel_flag: Arc::new(AtomicBool::new(false)),
            overlay_tx,
            frame_tap: None,
            failure_limit: DEFAULT_FAILURE_LIMIT,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Record each processed frame, as a JSON line, into a channel.
    pub fn with_frame_tap(mut self, feeder: ChunkFeeder) -> Self {
        self.frame_tap = Some(feeder);
        self
    }

    /// Stop with an error after this many failed reads in a row.
    pub fn with_failure_limit(mut self, limit: u32) -> Self {
        self.failure_limit = limit.max(1);
        self
    }

    /// Setting the returned flag tears the loop down before its next frame.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel_flag.clone()
    }

    pub fn subscribe_overlay(&self) -> watch::Receiver<Option<OverlayFrame>> {
        self.overlay_tx.subscribe()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.trigger.state()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Run until the source is exhausted or the loop is cancelled.
    ///
    /// Gesture state is discarded on exit either way.
    pub async fn run(&mut self, source: &mut dyn KeypointSource) -> AppResult<LoopSummary> {
        source.ready().await?;
        tracing::info!("Detection loop running");

        let mut summary = LoopSummary::default();
        let mut consecutive_failures = 0u32;
        loop {
            if self.is_cancelled() {
                tracing::info!("Detection loop cancelled");
                break;
            }

            let frame = match source.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!("Keypoint source exhausted");
                    break;
                }
                Err(e) => {
                    summary.skipped += 1;
                    consecutive_failures += 1;
                    if consecutive_failures >= self.failure_limit {
                        tracing::error!(
                            "Giving up after {} failed reads in a row: {}",
                            consecutive_failures,
                            e
                        );
                        self.trigger.reset();
                        return Err(e.into());
                    }
                    tracing::warn!("Skipping frame: {}", e);
                    let backoff = FAILURE_BACKOFF_MS * u64::from(consecutive_failures.min(10));
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    continue;
                }
            };
            consecutive_failures = 0;

            // Teardown may have happened while waiting on the source
            if self.is_cancelled() {
                tracing::info!("Detection loop cancelled");
                break;
            }

            summary.frames += 1;
            if self.process_frame(frame).await {
                summary.fires += 1;
            }
        }

        self.trigger.reset();
        tracing::info!(
            "Detection loop stopped: {} frames, {} fires, {} skipped",
            summary.frames,
            summary.fires,
            summary.skipped
        );
        Ok(summary)
    }

    /// Returns whether the frame fired the gesture.
    async fn process_frame(&mut self, frame: Frame) -> bool {
        let now = frame.timestamp_ms.unwrap_or_else(|| self.clock.now_ms());
        let fire = self.trigger.step(&frame.hands, now);

        let mut app = self.app.lock().await;

        if let Some(event) = fire {
            match app.handle_fire(event).await {
                Ok(outcome) => tracing::debug!("Fire handled: {:?}", outcome),
                Err(e) => tracing::warn!("Fire at {}ms not handled: {}", event.at, e),
            }
        }

        if let Some(tap) = &self.frame_tap {
            match serde_json::to_vec(&frame) {
                Ok(mut line) => {
                    line.push(b'\n');
                    tap.push(line);
                }
                Err(e) => tracing::warn!("Failed to encode frame: {}", e),
            }
        }
        if let Err(e) = app.controller_mut().pump().await {
            tracing::warn!("Failed to collect recording chunks: {}", e);
        }

        let snapshot = OverlayFrame::build(
            OverlayInput {
                timestamp_ms: now,
                hands: &frame.hands,
                gesture: self.trigger.state(),
                hold_ms: self.trigger.config().hold_ms,
                order_id: app.order_id(),
                recording: app.is_recording(),
                status: app.status_text(),
            },
            Local::now(),
        );
        self.overlay_tx.send_replace(Some(snapshot));

        fire.is_some()
    }

    /// Run on a background task.
    pub fn spawn(
        mut self,
        mut source: Box<dyn KeypointSource>,
    ) -> JoinHandle<AppResult<LoopSummary>> {
        tokio::spawn(async move { self.run(source.as_mut()).await })
    }
}
