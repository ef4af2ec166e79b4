//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies
//!
//! Presentation reads state (positions, opacity, scale, HUD counters) after
//! each tick; it never drives it.

pub mod aim;
pub mod collision;
pub mod entity;
pub mod hitbox;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use schedule::{Scheduler, TaskKind};
pub use state::{
    Behavior, BatPhase, DeathAnim, Entity, EntityKind, GameState, GhostPhase, GraveSlots,
    Projectile,
};
pub use tick::{TickInput, autoplay_input, tick};
