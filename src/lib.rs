//! Monster Splash - a graveyard balloon-toss arcade minigame
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, behavior state machines,
//!   aiming, collisions, economy)
//! - `flow`: Title screen and outer session driver
//! - `tuning`: Data-driven game balance

pub mod flow;
pub mod sim;
pub mod tuning;

pub use flow::{App, TitleFlow};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching per-tick counters)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second
    pub const TICK_HZ: u32 = 60;

    /// Playfield dimensions (screen space, y grows downward)
    pub const WORLD_WIDTH: f32 = 720.0;
    pub const WORLD_HEIGHT: f32 = 300.0;
    /// Ground line where zombies walk and graves sit
    pub const GROUND_Y: f32 = 300.0;

    /// Entities outside this expanded region are culled
    pub const CULL_MIN_X: f32 = -30.0;
    pub const CULL_MAX_X: f32 = 750.0;
    pub const CULL_MIN_Y: f32 = -30.0;
    pub const CULL_MAX_Y: f32 = 400.0;

    /// Downward acceleration applied to thrown balloons (px/s^2)
    pub const GRAVITY: f32 = 600.0;
    /// Throw speed at 100 power (px/s)
    pub const MAX_THROW_SPEED: f32 = 1000.0;

    /// The throwing hand sits on a fixed horizontal rail
    pub const HAND_Y: f32 = 280.0;
    pub const HAND_MIN_X: f32 = 8.0;
    pub const HAND_MAX_X: f32 = 652.0;

    /// Balloon collision radius (scaled sprite)
    pub const BALLOON_RADIUS: f32 = 7.5;
}

/// Convert a millisecond delay to whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::TICK_HZ).div_ceil(1000).max(1)
}
