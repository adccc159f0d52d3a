//! Open-hand classification
//!
//! A finger counts as extended when its tip sits strictly above (smaller
//! y than) its other three joints. A hand is open when all five are.
//!
//! The heuristic only holds for an upright hand with fingers pointing up.
//! A hand held sideways or upside-down will be misclassified; callers
//! that need rotation invariance must normalize orientation first.

use super::landmarks::{Finger, FingerName, Hand};

/// Whether a single finger is extended upward.
pub fn is_finger_extended(finger: &Finger<'_>) -> bool {
    let tip_y = finger.tip().y;
    tip_y < finger.pip().y && tip_y < finger.dip().y && tip_y < finger.mcp().y
}

/// Per-finger extension in thumb..pinky order.
///
/// Returns `None` for hands with fewer than 21 keypoints.
pub fn extended_fingers(hand: &Hand) -> Option<[bool; 5]> {
    let mut extended = [false; 5];
    for (slot, name) in extended.iter_mut().zip(FingerName::ALL) {
        *slot = is_finger_extended(&hand.finger(name)?);
    }
    Some(extended)
}

/// Whether the hand is open (all five fingers extended).
///
/// Incomplete hands are never open.
pub fn is_open_hand(hand: &Hand) -> bool {
    extended_fingers(hand)
        .map(|fingers| fingers.iter().all(|&e| e))
        .unwrap_or(false)
}
