//! Hold-to-fire gesture trigger
//!
//! Turns the per-frame open-hand judgment into discrete fire events.
//! A fire needs a single open hand held for `hold_ms`, and at least
//! `cooldown_ms` since the previous fire. Time is injected by the caller
//! so hold length follows wall-clock deltas, not frame count.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::pose::{is_open_hand, Hand};

/// Milliseconds on the caller's clock.
pub type TimestampMs = u64;

// ── Config ─────────────────────────────────────────────────

/// Timing thresholds for the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// How long a single open hand must be held before firing.
    pub hold_ms: u64,
    /// Minimum time between two fires.
    pub cooldown_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_ms: 1000,
            cooldown_ms: 5000,
        }
    }
}

// ── State ──────────────────────────────────────────────────

/// Raw trigger state, exposed read-only to overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureState {
    /// When the current hold began. `None` while idle.
    pub hand_open_since: Option<TimestampMs>,
    /// When the last fire was emitted.
    pub last_fire_time: Option<TimestampMs>,
}

impl GestureState {
    pub fn phase(&self) -> GesturePhase {
        match self.hand_open_since {
            Some(since) => GesturePhase::Holding { since },
            None => GesturePhase::Idle,
        }
    }
}

/// Derived view of [`GestureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum GesturePhase {
    Idle,
    Holding { since: TimestampMs },
}

/// Emitted once per completed hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireEvent {
    /// Frame timestamp that completed the hold.
    pub at: TimestampMs,
    /// How long the hand had been held when the event fired.
    pub held_ms: u64,
}

/// Two-state (idle / holding) trigger machine.
#[derive(Debug, Clone, Default)]
pub struct GestureTrigger {
    config: GestureConfig,
    state: GestureState,
}

impl GestureTrigger {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn phase(&self) -> GesturePhase {
        self.state.phase()
    }

    /// Feed one frame of detections.
    ///
    /// Must be called at most once per frame and never concurrently.
    pub fn step(&mut self, hands: &[Hand], now: TimestampMs) -> Option<FireEvent> {
        let single_open = matches!(hands, [hand] if is_open_hand(hand));

        if !single_open {
            if let Some(since) = self.state.hand_open_since.take() {
                debug!(
                    "Hold released after {}ms ({} hands)",
                    now.saturating_sub(since),
                    hands.len()
                );
            }
            return None;
        }

        let since = match self.state.hand_open_since {
            Some(since) => since,
            None => {
                debug!("Open hand detected at {}ms, holding", now);
                self.state.hand_open_since = Some(now);
                now
            }
        };

        let held_ms = now.saturating_sub(since);
        if held_ms < self.config.hold_ms {
            return None;
        }

        let cooled_down = self
            .state
            .last_fire_time
            .map_or(true, |last| now.saturating_sub(last) >= self.config.cooldown_ms);
        if !cooled_down {
            // Hold stays anchored; fires as soon as the cooldown clears.
            trace!("Hold complete but cooling down");
            return None;
        }

        self.state.last_fire_time = Some(now);
        self.state.hand_open_since = None;
        info!("Gesture fired at {}ms after {}ms hold", now, held_ms);

        Some(FireEvent { at: now, held_ms })
    }

    /// Discard all progress. Called on detection loop teardown.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }
}
