//! Overlay snapshots
//!
//! Everything a renderer needs to draw one frame: keypoint dots per hand,
//! the wall clock, the current order id and the gesture/recording state.
//! Snapshots are plain data; renderers never write back.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::gesture::{GesturePhase, GestureState, TimestampMs};
use crate::pose::{extended_fingers, Hand};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandOverlay {
    /// Keypoint positions in source-frame pixels
    pub points: Vec<[f64; 2]>,
    /// Per-finger extension, thumb first. Empty for incomplete hands.
    pub extended: Vec<bool>,
    pub open: bool,
}

impl HandOverlay {
    pub fn from_hand(hand: &Hand) -> Self {
        let extended = extended_fingers(hand).map(Vec::from).unwrap_or_default();
        let open = !extended.is_empty() && extended.iter().all(|&e| e);
        Self {
            points: hand.keypoints.iter().map(|kp| [kp.x, kp.y]).collect(),
            extended,
            open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayFrame {
    pub timestamp_ms: TimestampMs,
    /// Local time as HH:MM:SS
    pub clock_text: String,
    pub order_id: Option<String>,
    pub recording: bool,
    pub status: Option<String>,
    pub gesture: GestureState,
    /// Progress of the current hold toward firing (0.0-1.0)
    pub hold_progress: f64,
    pub hands: Vec<HandOverlay>,
}

/// Inputs for one snapshot, borrowed from the detection loop.
pub struct OverlayInput<'a> {
    pub timestamp_ms: TimestampMs,
    pub hands: &'a [Hand],
    pub gesture: GestureState,
    pub hold_ms: u64,
    pub order_id: Option<&'a str>,
    pub recording: bool,
    pub status: Option<String>,
}

impl OverlayFrame {
    pub fn build(input: OverlayInput<'_>, wall_clock: DateTime<Local>) -> Self {
        let hold_progress = match input.gesture.phase() {
            GesturePhase::Holding { since } if input.hold_ms > 0 => {
                let held = input.timestamp_ms.saturating_sub(since) as f64;
                (held / input.hold_ms as f64).min(1.0)
            }
            GesturePhase::Holding { .. } => 1.0,
            GesturePhase::Idle => 0.0,
        };

        Self {
            timestamp_ms: input.timestamp_ms,
            clock_text: wall_clock.format("%H:%M:%S").to_string(),
            order_id: input.order_id.map(str::to_string),
            recording: input.recording,
            status: input.status,
            gesture: input.gesture,
            hold_progress,
            hands: input.hands.iter().map(HandOverlay::from_hand).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::classifier::fixtures::{fist, open_hand};
    use chrono::TimeZone;

    fn input<'a>(hands: &'a [Hand], gesture: GestureState, now: u64) -> OverlayInput<'a> {
        OverlayInput {
            timestamp_ms: now,
            hands,
            gesture,
            hold_ms: 1000,
            order_id: Some("A-1"),
            recording: true,
            status: None,
        }
    }

    #[test]
    fn test_snapshot_contents() {
        let hands = vec![open_hand(), fist()];
        let wall = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        let frame = OverlayFrame::build(input(&hands, GestureState::default(), 0), wall);

        assert_eq!(frame.clock_text, "09:05:07");
        assert_eq!(frame.order_id.as_deref(), Some("A-1"));
        assert_eq!(frame.hands.len(), 2);
        assert_eq!(frame.hands[0].points.len(), 21);
        assert!(frame.hands[0].open);
        assert!(!frame.hands[1].open);
        assert_eq!(frame.hold_progress, 0.0);
    }

    #[test]
    fn test_hold_progress() {
        let hands = vec![open_hand()];
        let gesture = GestureState {
            hand_open_since: Some(1000),
            last_fire_time: None,
        };
        let wall = Local::now();

        let frame = OverlayFrame::build(input(&hands, gesture, 1250), wall);
        assert_eq!(frame.hold_progress, 0.25);

        let frame = OverlayFrame::build(input(&hands, gesture, 9000), wall);
        assert_eq!(frame.hold_progress, 1.0);
    }

    #[test]
    fn test_incomplete_hand_overlay() {
        let mut partial = open_hand();
        partial.keypoints.truncate(8);
        let overlay = HandOverlay::from_hand(&partial);
        assert_eq!(overlay.points.len(), 8);
        assert!(overlay.extended.is_empty());
        assert!(!overlay.open);
    }
}
