//! Replay keypoint sources
//!
//! Sources that play back previously captured detections, either from
//! memory or from a JSON-lines file with one [`Frame`] per line.

use super::traits::{Frame, KeypointSource, SourceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Plays back a fixed script of frames. Entries can also be read
/// failures, to simulate a flaky detector.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Result<Frame, String>>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().map(Ok).collect(),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(Ok(frame));
    }

    /// Queue a failed read.
    pub fn push_failure(&mut self, reason: impl Into<String>) {
        self.frames.push_back(Err(reason.into()));
    }
}

#[async_trait]
impl KeypointSource for ScriptedSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        match self.frames.pop_front() {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(reason)) => Err(SourceError::Unavailable(reason)),
            None => Ok(None),
        }
    }
}

/// Reads frames from a JSON-lines file.
///
/// With `realtime` enabled, playback sleeps between frames for the gap
/// between their timestamps so the hold timer sees real pacing.
pub struct JsonlSource {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    line_no: usize,
    realtime: bool,
    last_timestamp: Option<u64>,
}

impl JsonlSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lines: None,
            line_no: 0,
            realtime: false,
            last_timestamp: None,
        }
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    async fn pace(&mut self, frame: &Frame) {
        let Some(ts) = frame.timestamp_ms else {
            return;
        };
        if self.realtime {
            if let Some(prev) = self.last_timestamp {
                let gap = ts.saturating_sub(prev);
                if gap > 0 {
                    tokio::time::sleep(Duration::from_millis(gap)).await;
                }
            }
        }
        self.last_timestamp = Some(ts);
    }
}

#[async_trait]
impl KeypointSource for JsonlSource {
    async fn ready(&mut self) -> Result<(), SourceError> {
        if self.lines.is_none() {
            let file = File::open(&self.path).await?;
            tracing::info!("Replaying keypoints from {:?}", self.path);
            self.lines = Some(BufReader::new(file).lines());
        }
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let lines = self
            .lines
            .as_mut()
            .ok_or_else(|| SourceError::Unavailable("source not opened".to_string()))?;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(None),
                Err(e) => {
                    // The unreadable line is consumed all the same
                    self.line_no += 1;
                    return Err(e.into());
                }
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let frame: Frame = serde_json::from_str(&line).map_err(|source| SourceError::Parse {
                line: self.line_no,
                source,
            })?;
            self.pace(&frame).await;
            return Ok(Some(frame));
        }
    }
}
