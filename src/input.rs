//! UI-agnostic input model.
//!
//! The external input layer reports which logical keys are held each tick.
//! [`InputSnapshot`] turns that into press/release edges, and [`DoubleTap`]
//! turns press edges into roll triggers.

use crate::core::config::InputConfig;
use crate::core::constants::Millis;
use serde::{Deserialize, Serialize};

/// Logical keys held during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

impl InputState {
    pub const NONE: InputState = InputState {
        left: false,
        right: false,
        shoot: false,
    };

    /// -1 for left, 1 for right, 0 when neither or both are held.
    pub fn move_direction(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Held state plus edges relative to the previous update.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub down: InputState,
    pub pressed: InputState,
    pub released: InputState,
    prev_down: InputState,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, held: InputState) {
        let prev = self.prev_down;
        self.down = held;
        self.pressed = InputState {
            left: held.left && !prev.left,
            right: held.right && !prev.right,
            shoot: held.shoot && !prev.shoot,
        };
        self.released = InputState {
            left: !held.left && prev.left,
            right: !held.right && prev.right,
            shoot: !held.shoot && prev.shoot,
        };
        self.prev_down = held;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapDirection {
    Left,
    Right,
}

/// Double-tap roll requests for this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollTrigger {
    pub left: bool,
    pub right: bool,
}

impl RollTrigger {
    pub fn any(&self) -> bool {
        self.left || self.right
    }

    /// Roll direction, left winning a tie.
    pub fn direction(&self) -> Option<i8> {
        if self.left {
            Some(-1)
        } else if self.right {
            Some(1)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TapTimes {
    last_tap: Option<Millis>,
    last_input: Option<Millis>,
}

/// Detects double taps per direction.
///
/// A raw press closer than the debounce floor to the previous raw press is
/// swallowed. Otherwise it registers as a tap, and it is a double tap when it
/// lands within the window of the previous registered tap.
#[derive(Debug, Clone)]
pub struct DoubleTap {
    window_ms: Millis,
    debounce_ms: Millis,
    left: TapTimes,
    right: TapTimes,
}

impl DoubleTap {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            window_ms: config.double_tap_window_ms,
            debounce_ms: config.tap_debounce_ms,
            left: TapTimes::default(),
            right: TapTimes::default(),
        }
    }

    pub fn register_tap(&mut self, direction: TapDirection, now: Millis) -> bool {
        let (window_ms, debounce_ms) = (self.window_ms, self.debounce_ms);
        let times = match direction {
            TapDirection::Left => &mut self.left,
            TapDirection::Right => &mut self.right,
        };

        if let Some(last_input) = times.last_input {
            if now.saturating_sub(last_input) < debounce_ms {
                times.last_input = Some(now);
                return false;
            }
        }

        let is_double = times
            .last_tap
            .is_some_and(|last_tap| now.saturating_sub(last_tap) <= window_ms);
        times.last_tap = Some(now);
        times.last_input = Some(now);
        is_double
    }

    /// Feed this tick's press edges and return the resulting roll requests.
    pub fn resolve(&mut self, snapshot: &InputSnapshot, now: Millis) -> RollTrigger {
        RollTrigger {
            left: snapshot.pressed.left && self.register_tap(TapDirection::Left, now),
            right: snapshot.pressed.right && self.register_tap(TapDirection::Right, now),
        }
    }

    pub fn reset(&mut self) {
        self.left = TapTimes::default();
        self.right = TapTimes::default();
    }
}
