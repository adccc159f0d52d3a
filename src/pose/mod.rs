//! Hand pose module
//!
//! Keypoint data model and the open-hand classifier.

pub mod classifier;
pub mod landmarks;

pub use classifier::{extended_fingers, is_open_hand};
pub use landmarks::{Finger, FingerName, Hand, Keypoint, Landmark, LANDMARK_COUNT};
