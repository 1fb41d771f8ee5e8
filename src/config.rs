//! Engine configuration.
//!
//! Everything the engine and scheduler read at runtime lives in these two
//! structs; there are no ambient lookups inside game logic. Collaborators may
//! hand over a flat named-option map (e.g. deserialized user settings); any
//! absent or non-numeric entry keeps the documented default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::*;

/// Board geometry and queue behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Hidden spawn rows above the visible area.
    pub buffer: usize,
    /// One marked piece per this many queue pops.
    pub card_frequency: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            buffer: DEFAULT_BUFFER,
            card_frequency: DEFAULT_CARD_FREQUENCY,
        }
    }
}

impl GameConfig {
    /// Total rows including the spawn buffer.
    pub fn total_rows(&self) -> usize {
        self.height + self.buffer
    }
}

/// All scheduler delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Gravity tick interval.
    pub gravity_ms: u32,
    /// Delay before horizontal auto-repeat starts.
    pub das_ms: u32,
    /// Interval between horizontal auto-repeats.
    pub arr_ms: u32,
    /// Interval between soft-drop auto-repeats.
    pub soft_drop_ms: u32,
    /// Short lock delay: cleared by shifts and rotations.
    pub l1_ms: u32,
    /// Long lock delay: the absolute ceiling, cleared by rotations only.
    pub l2_ms: u32,
    /// Infinite-lock window re-arm delay.
    pub l3_ms: u32,
    /// Interval between resume-countdown steps.
    pub countdown_step_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            gravity_ms: DEFAULT_GRAVITY_MS,
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            soft_drop_ms: DEFAULT_SOFT_DROP_MS,
            l1_ms: DEFAULT_L1_MS,
            l2_ms: DEFAULT_L2_MS,
            l3_ms: DEFAULT_L3_MS,
            countdown_step_ms: DEFAULT_COUNTDOWN_STEP_MS,
        }
    }
}

impl TimingConfig {
    /// Apply a flat named-option delta. Unknown keys are ignored; values that
    /// are not positive numbers keep the current setting.
    pub fn apply_named(&mut self, options: &serde_json::Map<String, Value>) {
        for (key, value) in options {
            let Some(ms) = as_ms(value) else {
                continue;
            };
            match key.as_str() {
                "gravity_ms" => self.gravity_ms = ms,
                "das_ms" => self.das_ms = ms,
                "arr_ms" => self.arr_ms = ms,
                "soft_drop_ms" => self.soft_drop_ms = ms,
                "l1_ms" => self.l1_ms = ms,
                "l2_ms" => self.l2_ms = ms,
                "l3_ms" => self.l3_ms = ms,
                "countdown_step_ms" => self.countdown_step_ms = ms,
                _ => {}
            }
        }
    }

    /// Build a config from a named-option map, starting from defaults.
    pub fn from_named(options: &serde_json::Map<String, Value>) -> Self {
        let mut cfg = Self::default();
        cfg.apply_named(options);
        cfg
    }
}

fn as_ms(value: &Value) -> Option<u32> {
    let n = value.as_u64()?;
    if n == 0 || n > u32::MAX as u64 {
        return None;
    }
    Some(n as u32)
}

/// Full engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub timing: TimingConfig,
}
