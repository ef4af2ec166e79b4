//! Data-driven game balance
//!
//! Every gameplay threshold lives here as a named field so a balance pass is
//! a JSON edit, not a code hunt. Two variants of the original balance sheet
//! circulated (spawn cap 8 vs 4, bat unlock 8s vs 12s, zombie power window
//! [15,60] vs [10,40]); the defaults below are the canonical set.

use serde::{Deserialize, Serialize};

/// An inclusive [min, max] range for uniform rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Gameplay policy constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // === Economy ===
    /// Balloons at session start
    pub initial_ammo: u32,
    /// Ammo granted per bat hit
    pub bat_reward: u32,
    /// Score values per kind
    pub zombie_points: u32,
    pub ghost_points: u32,
    pub witch_points: u32,

    // === Spawning ===
    /// Zombie generator interval (ms), re-rolled each firing
    pub zombie_interval_ms: Span,
    /// Special generator interval (ms), re-rolled each firing
    pub special_interval_ms: Span,
    /// Zombie generator skips when this many zombies are alive
    pub max_zombies: usize,
    /// Special generator skips when this many specials (ghost/witch/bat)
    /// are alive
    pub special_cap: usize,
    /// Special roll (1-100): below this spawns a ghost
    pub ghost_roll_under: u32,
    /// Special roll: below this (and not a ghost) spawns a witch; the
    /// remainder is a bat, wasted while the bat is still locked
    pub witch_roll_under: u32,
    /// Bat spawns unlock this long after session start
    pub bat_unlock_ms: u32,
    /// Unlock bats immediately (inspection/debug sessions)
    pub debug_unlock_bat: bool,

    // === Movement ===
    /// Zombie walk speed (px/s)
    pub zombie_speed: f32,
    /// Witch flight speed (px/s)
    pub witch_speed: f32,
    /// Bat upward escape speed once it wakes (px/s, applied as -y)
    pub bat_fly_speed: f32,
    /// Bat descent speed while settling into its rest position (px/s)
    pub bat_entry_speed: f32,
    /// Bat rest position ranges
    pub bat_rest_x: Span,
    pub bat_rest_y: Span,
    /// Bat waits this long (ms) after its first update before flying off
    pub bat_wait_ms: Span,

    // === Ghost machine ===
    /// Total rise distance (px) and duration (ticks)
    pub ghost_rise_height: f32,
    pub ghost_rise_ticks: u32,
    /// Horizontal drift magnitude while rising (px/s, sign rolled)
    pub ghost_drift_max: i32,
    /// Pause duration at full height (ticks)
    pub ghost_pause_ticks: Span,
    /// Upward speed while fading (px/tick)
    pub ghost_fade_rise: f32,
    /// Opacity lost per tick while fading
    pub ghost_fade_step: f32,

    // === Aiming ===
    /// Power added per tick while charging (triangle wave)
    pub power_step: u32,
    /// Releases below this power are mis-fires: no throw, no ammo spent
    pub min_charge: u32,
    /// Intentional throws are floored to this effective power
    pub power_floor: u32,
    /// Refractory lock after a throw (ms) during which releases are refused
    pub fire_lock_ms: u32,

    // === Damage windows ===
    /// Zombie hits register only inside this power range
    pub zombie_window: Span,
    /// Ghost hits additionally require the ghost to be pausing
    pub ghost_window: Span,

    // === Presentation scale factors ===
    pub zombie_scale: f32,
    pub ghost_scale: f32,
    pub witch_scale: f32,
    pub bat_scale: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_ammo: 10,
            bat_reward: 5,
            zombie_points: 5,
            ghost_points: 10,
            witch_points: 20,

            zombie_interval_ms: Span::new(2500, 4000),
            special_interval_ms: Span::new(2000, 3500),
            max_zombies: 2,
            special_cap: 8,
            ghost_roll_under: 60,
            witch_roll_under: 85,
            bat_unlock_ms: 8000,
            debug_unlock_bat: false,

            zombie_speed: 50.0,
            witch_speed: 180.0,
            bat_fly_speed: 400.0,
            bat_entry_speed: 300.0,
            bat_rest_x: Span::new(100, 620),
            bat_rest_y: Span::new(50, 100),
            bat_wait_ms: Span::new(2800, 3500),

            ghost_rise_height: 40.0,
            ghost_rise_ticks: 30,
            ghost_drift_max: 20,
            ghost_pause_ticks: Span::new(90, 150),
            ghost_fade_rise: 3.0,
            ghost_fade_step: 0.05,

            power_step: 3,
            min_charge: 5,
            power_floor: 20,
            fire_lock_ms: 10,

            zombie_window: Span::new(15, 60),
            ghost_window: Span::new(30, 70),

            zombie_scale: 0.5,
            ghost_scale: 0.5,
            witch_scale: 0.42,
            bat_scale: 0.5,
        }
    }
}

impl Tuning {
    /// Parse a tuning sheet from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
