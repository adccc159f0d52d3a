//! Transient status messages
//!
//! Holds the single user-visible message ("enter a filename first",
//! "recording started", ...) and expires it after a fixed TTL.

use serde::Serialize;
use std::time::{Duration, Instant};

pub const EMPTY_LABEL_MESSAGE: &str = "⚠️ Please enter a filename first!";
pub const STARTED_MESSAGE: &str = "🎥 Recording started...";
pub const STOPPED_MESSAGE: &str = "📥 Recording stopped, downloading...";
pub const SAVE_FAILED_MESSAGE: &str = "❌ Recording could not be saved";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub posted_at: Instant,
}

#[derive(Debug)]
pub struct StatusBoard {
    ttl: Duration,
    current: Option<Notice>,
}

impl StatusBoard {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl: Duration::from_millis(ttl_ms),
            current: None,
        }
    }

    /// Replace the current message.
    pub fn post(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.post_at(text, level, Instant::now());
    }

    pub fn post_at(&mut self, text: impl Into<String>, level: NoticeLevel, now: Instant) {
        self.current = Some(Notice {
            text: text.into(),
            level,
            posted_at: now,
        });
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    /// Message visible at `now`, if it has not expired.
    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| now.saturating_duration_since(notice.posted_at) < self.ttl)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires_after_ttl() {
        let mut board = StatusBoard::new(3000);
        let t0 = Instant::now();
        board.post_at(EMPTY_LABEL_MESSAGE, NoticeLevel::Warning, t0);

        let visible = board.current_at(t0 + Duration::from_millis(2999)).unwrap();
        assert_eq!(visible.text, EMPTY_LABEL_MESSAGE);
        assert_eq!(visible.level, NoticeLevel::Warning);
        assert!(board.current_at(t0 + Duration::from_millis(3000)).is_none());
    }

    #[test]
    fn test_new_message_replaces_old() {
        let mut board = StatusBoard::new(3000);
        let t0 = Instant::now();
        board.post_at(STARTED_MESSAGE, NoticeLevel::Info, t0);
        board.post_at(STOPPED_MESSAGE, NoticeLevel::Info, t0 + Duration::from_millis(2500));

        let visible = board.current_at(t0 + Duration::from_millis(4000)).unwrap();
        assert_eq!(visible.text, STOPPED_MESSAGE);
    }

    #[test]
    fn test_clear() {
        let mut board = StatusBoard::new(3000);
        board.post("hello", NoticeLevel::Info);
        board.clear();
        assert!(board.current().is_none());
    }
}
