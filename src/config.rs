//! Game tunables
//!
//! Everything here changes pacing or difficulty without touching entity
//! logic. Geometry (screen size, sprite shapes, scroll speeds) lives in
//! [`crate::consts`] instead because the bitmaps are sized for it.

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, TICKS_PER_SEC};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Simulation tick rate (drives all timer conversions below)
    pub ticks_per_sec: u32,

    // === Mode timers ===
    /// Idle time in demo mode before the screen saver kicks in (seconds)
    pub demo_timeout_secs: u32,
    /// Time the "Game Over" banner stays up before returning to demo (seconds)
    pub game_over_timeout_secs: u32,
    /// Screen-saver dark period (seconds)
    pub saver_hide_secs: u32,

    // === Difficulty ===
    /// Lower bound for the tunnel gap as the score-based ramp tightens it.
    /// Must stay >= 1 or the tunnel seals shut; `validate` enforces this.
    pub min_gap_floor: u8,
    /// Score points per pixel of gap reduction
    pub gap_score_divisor: u16,

    // === Mine planting ===
    /// Plant threshold out of 256 per tick (8 = ~3%)
    pub mine_plant_threshold: u8,
    /// Minimum horizontal spacing between consecutive mines (pixels)
    pub mine_dist_min: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_sec: TICKS_PER_SEC,

            demo_timeout_secs: 20,
            game_over_timeout_secs: 5,
            saver_hide_secs: 3,

            min_gap_floor: 4,
            gap_score_divisor: 2000,

            mine_plant_threshold: 8,
            mine_dist_min: 10,
        }
    }
}

impl GameConfig {
    /// Clamp out-of-range values to something the simulation can run with
    pub fn validate(mut self) -> Self {
        if self.ticks_per_sec == 0 {
            self.ticks_per_sec = TICKS_PER_SEC;
        }
        self.min_gap_floor = self.min_gap_floor.clamp(1, SCREEN_HEIGHT - 2);
        if self.gap_score_divisor == 0 {
            self.gap_score_divisor = 2000;
        }
        self
    }

    /// Blink period for the demo prompt and the game-over banner (1/2 s)
    pub fn blink_ticks(&self) -> u32 {
        (self.ticks_per_sec / 2).max(1)
    }

    /// One-shot delay before demo escalates to the screen saver
    pub fn demo_timeout_ticks(&self) -> u32 {
        self.ticks_per_sec * self.demo_timeout_secs
    }

    /// One-shot delay before game-over returns to demo
    pub fn game_over_timeout_ticks(&self) -> u32 {
        self.ticks_per_sec * self.game_over_timeout_secs
    }

    /// Screen-saver dark period
    pub fn saver_hide_ticks(&self) -> u32 {
        self.ticks_per_sec * self.saver_hide_secs
    }

    /// Screen-saver prompt-visible period (1/3 s)
    pub fn saver_show_ticks(&self) -> u32 {
        (self.ticks_per_sec / 3).max(1)
    }

    /// The difficulty ramp: gap narrows as the score grows, clamped at
    /// the configured floor
    pub fn minimal_gap_for_score(&self, score: u16) -> u8 {
        let base = u16::from(SCREEN_HEIGHT) - 3;
        let narrowed = base.saturating_sub(score / self.gap_score_divisor);
        (narrowed as u8).max(self.min_gap_floor)
    }

    /// Serialize to JSON (host-side persistence)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, clamping invalid values
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::validate)
    }
}
