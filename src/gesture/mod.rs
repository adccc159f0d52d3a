//! Gesture trigger module
//!
//! Converts per-frame hand detections into fire events.

pub mod trigger;

pub use trigger::{FireEvent, GestureConfig, GesturePhase, GestureState, GestureTrigger, TimestampMs};
