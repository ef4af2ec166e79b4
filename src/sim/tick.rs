//! Fixed timestep session tick
//!
//! One call advances the whole session: input edges, aim charge, the task
//! queue (spawn generators, unlocks, wake timers), entity machines, balloon
//! flight, then collision resolution against this tick's post-movement
//! positions, and finally the game-over check. Pausing freezes all of it
//! uniformly, the task queue included.

use super::{aim, collision, entity, hitbox, spawn};
use super::schedule::TaskKind;
use super::state::GameState;
use crate::consts::*;

/// Input edges for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x, tracked by the throwing hand
    pub pointer_x: Option<f32>,
    /// Press edge: start aiming
    pub press: bool,
    /// Release edge: throw or cancel
    pub release: bool,
    /// Pause toggle edge
    pub pause: bool,
    /// Restart signal, honored only on the game-over screen
    pub restart: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_game_over {
        if input.restart {
            restart(state);
        }
        return;
    }

    if input.pause {
        state.is_paused = !state.is_paused;
        log::debug!("pause: {}", state.is_paused);
    }
    if state.is_paused {
        return;
    }

    state.time_ticks += 1;

    if let Some(x) = input.pointer_x {
        state.hand_x = x.clamp(HAND_MIN_X, HAND_MAX_X);
    }

    // A release uses the power shown on the previous tick; the charge only
    // advances afterwards
    if input.press {
        aim::press(state);
    }
    if input.release {
        aim::release(state);
    }
    aim::advance_charge(state);

    let fired = state.scheduler.advance(&mut state.rng);
    for kind in fired {
        match kind {
            TaskKind::SpawnZombie => spawn::zombie_generator(state),
            TaskKind::SpawnSpecial => spawn::special_generator(state),
            TaskKind::UnlockBat => {
                state.bat_locked = false;
                log::debug!("bat spawns unlocked");
            }
            TaskKind::WakeBat { entity_id } => entity::wake_bat(state, entity_id),
            TaskKind::ClearFireLock => state.fire_locked = false,
        }
    }

    entity::update_entities(state, dt);
    update_projectiles(state, dt);

    let pairs = hitbox::detect_pairs(&state.projectiles, &state.entities);
    if !pairs.is_empty() {
        collision::resolve_hits(state, &pairs);
    }

    if state.ammo == 0 && state.projectiles.is_empty() {
        trigger_game_over(state);
    }
}

/// Balloon flight and the upward-travel-only damage window
fn update_projectiles(state: &mut GameState, dt: f32) {
    state.projectiles.retain_mut(|p| {
        if let Some(ticks) = &mut p.pop_ticks {
            // Popped balloon: swell and vanish, still counted for game-over
            *ticks -= 1;
            let frac = *ticks as f32 / collision::POP_TICKS as f32;
            p.opacity = frac;
            p.scale = 0.5 + (1.0 - frac) * 0.25;
            return *ticks > 0;
        }

        p.vel.y += GRAVITY * dt;
        p.pos += p.vel * dt;

        // Past apex: the throw can no longer score. Never reverts.
        if p.can_damage && p.vel.y >= 0.0 {
            p.can_damage = false;
        }

        // Destroyed on contact with any world edge
        let r = BALLOON_RADIUS;
        p.pos.x - r > 0.0
            && p.pos.x + r < WORLD_WIDTH
            && p.pos.y - r > 0.0
            && p.pos.y + r < WORLD_HEIGHT
    });
}

/// Freeze the session and surface the final score
fn trigger_game_over(state: &mut GameState) {
    state.is_game_over = true;
    state.is_aiming = false;
    state.scheduler.cancel_all();
    for entity in &mut state.entities {
        entity.hitbox_enabled = false;
    }
    log::info!("game over: final score {}", state.score);
}

/// Reset to initial values and begin a new spawn schedule
fn restart(state: &mut GameState) {
    use rand::Rng;
    let seed = state.rng.random::<u64>();
    let tuning = state.tuning.clone();
    *state = GameState::with_tuning(seed, tuning);
    log::info!("session restarted with seed {seed}");
}

/// Synthesize input for an unattended demo session: sweep the hand, charge
/// into a rotating power band, release, restart when the run ends
pub fn autoplay_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    if state.is_game_over {
        input.restart = true;
        return input;
    }

    input.pointer_x = Some(100.0 + ((state.time_ticks * 3) % 520) as f32);

    if state.is_aiming {
        // Rotate through the zombie band, the ghost band, and a heavy lob
        let target = match (state.time_ticks / 120) % 3 {
            0 => 40,
            1 => 55,
            _ => 90,
        };
        if state.power >= target {
            input.release = true;
        }
    } else if state.ammo > 0 {
        input.press = true;
    }
    input
}
