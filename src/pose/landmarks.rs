//! Hand landmark data structures
//!
//! Models the 21 canonical keypoints a pose-detection model reports per
//! hand. Coordinates are pixels in the source frame, origin top-left.

use serde::{Deserialize, Serialize};

// ── Landmark definitions ───────────────────────────────────

/// The 21 canonical hand landmarks, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyFingerMcp,
    PinkyFingerPip,
    PinkyFingerDip,
    PinkyFingerTip,
}

/// Number of keypoints in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

impl Landmark {
    /// All landmarks in index order.
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexFingerMcp,
        Self::IndexFingerPip,
        Self::IndexFingerDip,
        Self::IndexFingerTip,
        Self::MiddleFingerMcp,
        Self::MiddleFingerPip,
        Self::MiddleFingerDip,
        Self::MiddleFingerTip,
        Self::RingFingerMcp,
        Self::RingFingerPip,
        Self::RingFingerDip,
        Self::RingFingerTip,
        Self::PinkyFingerMcp,
        Self::PinkyFingerPip,
        Self::PinkyFingerDip,
        Self::PinkyFingerTip,
    ];

    /// Array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Landmark at a given index, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

// ── Fingers ────────────────────────────────────────────────

/// The five fingers, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerName {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerName {
    pub const ALL: [FingerName; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// First keypoint index of this finger's 4-point run.
    /// Thumb covers 1-4, index 5-8, middle 9-12, ring 13-16, pinky 17-20.
    pub fn first_index(&self) -> usize {
        1 + (*self as usize) * 4
    }
}

/// A 2-D keypoint in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: Landmark,
    pub x: f64,
    pub y: f64,
}

impl Keypoint {
    pub fn new(name: Landmark, x: f64, y: f64) -> Self {
        Self { name, x, y }
    }
}

/// Four keypoints of one finger, ordered base to tip.
///
/// For the thumb the roles map onto CMC, MCP, IP, TIP.
#[derive(Debug, Clone, Copy)]
pub struct Finger<'a> {
    pub name: FingerName,
    points: &'a [Keypoint],
}

impl<'a> Finger<'a> {
    pub fn mcp(&self) -> &'a Keypoint {
        &self.points[0]
    }

    pub fn pip(&self) -> &'a Keypoint {
        &self.points[1]
    }

    pub fn dip(&self) -> &'a Keypoint {
        &self.points[2]
    }

    pub fn tip(&self) -> &'a Keypoint {
        &self.points[3]
    }
}

// ── Hand ───────────────────────────────────────────────────

/// One detected hand in one frame.
///
/// Deserialization accepts any number of keypoints; detectors drop
/// landmarks under occlusion and consumers must tolerate that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub keypoints: Vec<Keypoint>,

    /// Detector confidence (0.0-1.0), when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// "Left" or "Right" as reported by the detector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
}

impl Hand {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            score: None,
            handedness: None,
        }
    }

    /// Build a hand from raw positions, naming them by index.
    /// Positions past the 21st are ignored.
    pub fn from_positions(positions: &[(f64, f64)]) -> Self {
        let keypoints = positions
            .iter()
            .zip(Landmark::ALL.iter())
            .map(|(&(x, y), &name)| Keypoint::new(name, x, y))
            .collect();
        Self::new(keypoints)
    }

    /// Whether all 21 landmarks are present.
    pub fn is_complete(&self) -> bool {
        self.keypoints.len() >= LANDMARK_COUNT
    }

    /// Slice out one finger. `None` when the hand is incomplete.
    pub fn finger(&self, name: FingerName) -> Option<Finger<'_>> {
        if !self.is_complete() {
            return None;
        }
        let start = name.first_index();
        Some(Finger {
            name,
            points: &self.keypoints[start..start + 4],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices() {
        for (i, landmark) in Landmark::ALL.iter().enumerate() {
            assert_eq!(landmark.index(), i);
            assert_eq!(Landmark::from_index(i), Some(*landmark));
        }
        assert_eq!(Landmark::from_index(LANDMARK_COUNT), None);
    }

    #[test]
    fn test_finger_ranges() {
        assert_eq!(FingerName::Thumb.first_index(), 1);
        assert_eq!(FingerName::Index.first_index(), 5);
        assert_eq!(FingerName::Middle.first_index(), 9);
        assert_eq!(FingerName::Ring.first_index(), 13);
        assert_eq!(FingerName::Pinky.first_index(), 17);
    }

    #[test]
    fn test_finger_slices_named_points() {
        let positions: Vec<(f64, f64)> = (0..21).map(|i| (i as f64, 0.0)).collect();
        let hand = Hand::from_positions(&positions);

        let ring = hand.finger(FingerName::Ring).unwrap();
        assert_eq!(ring.mcp().name, Landmark::RingFingerMcp);
        assert_eq!(ring.tip().name, Landmark::RingFingerTip);
        assert_eq!(ring.tip().x, 16.0);

        let thumb = hand.finger(FingerName::Thumb).unwrap();
        assert_eq!(thumb.mcp().name, Landmark::ThumbCmc);
        assert_eq!(thumb.tip().name, Landmark::ThumbTip);
    }

    #[test]
    fn test_incomplete_hand_has_no_fingers() {
        let positions: Vec<(f64, f64)> = (0..12).map(|i| (i as f64, 0.0)).collect();
        let hand = Hand::from_positions(&positions);
        assert!(!hand.is_complete());
        assert!(hand.finger(FingerName::Index).is_none());
    }

    #[test]
    fn test_deserialize_detector_output() {
        let json = r#"{
            "keypoints": [{"name": "wrist", "x": 10.5, "y": 200.0}],
            "score": 0.92,
            "handedness": "Right"
        }"#;
        let hand: Hand = serde_json::from_str(json).unwrap();
        assert_eq!(hand.keypoints.len(), 1);
        assert_eq!(hand.keypoints[0].name, Landmark::Wrist);
        assert_eq!(hand.score, Some(0.92));
        assert_eq!(hand.handedness.as_deref(), Some("Right"));
    }
}
