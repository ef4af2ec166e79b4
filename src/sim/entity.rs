//! Per-type creature behavior
//!
//! Each entity advances its own machine once per tick. Transitions are
//! one-directional; the only preemption is the forced death sequence started
//! by the collision resolver. Ghost and bat behavior is lazily initialized on
//! the entity's first update so spawn stays a pure placement decision.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::schedule::{Scheduler, TaskKind};
use super::state::{BatPhase, Behavior, DeathAnim, Entity, EntityKind, GameState, GhostPhase};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::ms_to_ticks;

/// Nominal ghost sprite height (px); a fresh ghost snaps down by this times
/// its scale so it starts fully buried
pub const GHOST_SPRITE_HEIGHT: f32 = 120.0;

/// Death sequence durations (ticks)
pub const ZOMBIE_FADE_TICKS: u32 = 18;
pub const GHOST_DEATH_TICKS: u32 = 15;
pub const WITCH_SINK_TICKS: u32 = 24;
pub const WITCH_FADE_TICKS: u32 = 9;
/// How far a downed witch plummets before fading
pub const WITCH_SINK_DEPTH: f32 = 100.0;
pub const BAT_DEATH_TICKS: u32 = 9;

/// Advance every entity's machine by one tick, dropping the ones that
/// finished dying or wandered off-bounds. Grave slots held by removed
/// ghosts are released.
pub fn update_entities(state: &mut GameState, dt: f32) {
    let GameState {
        entities,
        rng,
        scheduler,
        graves,
        tuning,
        ..
    } = state;

    entities.retain_mut(|entity| {
        let alive = update_entity(entity, rng, scheduler, tuning, dt);
        if !alive {
            if let Some(slot) = entity.grave_slot.take() {
                graves.release(slot);
            }
            log::debug!("entity {} ({:?}) destroyed", entity.id, entity.kind);
        }
        alive
    });
}

/// Advance one entity; returns false once it should be destroyed
fn update_entity(
    entity: &mut Entity,
    rng: &mut Pcg32,
    scheduler: &mut Scheduler,
    tuning: &Tuning,
    dt: f32,
) -> bool {
    if matches!(entity.behavior, Behavior::Dormant) {
        init_dormant(entity, rng, scheduler, tuning);
    }

    match &mut entity.behavior {
        Behavior::Dormant => {}
        Behavior::Drift => {
            entity.pos += entity.vel * dt;
        }
        Behavior::Ghost(phase) => match phase {
            GhostPhase::Rising { target_y, drift } => {
                let target_y = *target_y;
                let drift = *drift;
                entity.pos.x += entity.vel.x * dt;
                entity.pos.y -= tuning.ghost_rise_height / tuning.ghost_rise_ticks as f32;

                let progress =
                    1.0 - (entity.pos.y - target_y) / tuning.ghost_rise_height;
                let eased = ease_out_sine(progress.clamp(0.0, 1.0));
                entity.opacity = eased;
                entity.scale = eased * tuning.ghost_scale;

                if entity.pos.y <= target_y {
                    entity.pos.y = target_y;
                    entity.vel.x = drift / 4.0;
                    entity.scale = tuning.ghost_scale;
                    let ticks = rng
                        .random_range(tuning.ghost_pause_ticks.min..=tuning.ghost_pause_ticks.max);
                    entity.behavior = Behavior::Ghost(GhostPhase::Pausing { ticks_left: ticks });
                }
            }
            GhostPhase::Pausing { ticks_left } => {
                entity.opacity = 1.0;
                entity.pos.x += entity.vel.x * dt;
                *ticks_left -= 1;
                if *ticks_left == 0 {
                    entity.vel.x = 0.0;
                    entity.behavior = Behavior::Ghost(GhostPhase::Fading);
                }
            }
            GhostPhase::Fading => {
                entity.pos.y -= tuning.ghost_fade_rise;
                entity.opacity -= tuning.ghost_fade_step;
                if entity.opacity <= 0.0 {
                    return false;
                }
            }
        },
        Behavior::Bat(phase) => match phase {
            BatPhase::Waiting { rest_y } => {
                // Settle down to the rest position, then hold for the wake timer
                if entity.pos.y < *rest_y {
                    entity.pos.y = (entity.pos.y + tuning.bat_entry_speed * dt).min(*rest_y);
                }
            }
            BatPhase::Flying => {
                entity.pos += entity.vel * dt;
            }
        },
        Behavior::Dying(anim) => return advance_death(&mut entity.pos, &mut entity.opacity, &mut entity.scale, anim, tuning),
    }

    in_bounds(entity.pos)
}

/// First-update initialization for lazily-started machines
fn init_dormant(entity: &mut Entity, rng: &mut Pcg32, scheduler: &mut Scheduler, tuning: &Tuning) {
    match entity.kind {
        EntityKind::Ghost => {
            // Sink below the grave line, then rise back out of it
            entity.pos.y += GHOST_SPRITE_HEIGHT * tuning.ghost_scale;
            let target_y = entity.pos.y - tuning.ghost_rise_height;
            let drift =
                rng.random_range(-tuning.ghost_drift_max..=tuning.ghost_drift_max) as f32;
            entity.vel.x = drift;
            entity.opacity = 0.0;
            entity.scale = 0.0;
            entity.behavior = Behavior::Ghost(GhostPhase::Rising { target_y, drift });
        }
        EntityKind::Bat => {
            let rest_y =
                rng.random_range(tuning.bat_rest_y.min..=tuning.bat_rest_y.max) as f32;
            let hold_ms = rng.random_range(tuning.bat_wait_ms.min..=tuning.bat_wait_ms.max);
            scheduler.schedule_once(
                ms_to_ticks(hold_ms),
                TaskKind::WakeBat {
                    entity_id: entity.id,
                },
            );
            entity.behavior = Behavior::Bat(BatPhase::Waiting { rest_y });
        }
        // Zombies and witches are created with Drift already set
        _ => entity.behavior = Behavior::Drift,
    }
}

/// Wake-timer expiry: if the bat is still alive and untouched, it flies off
pub fn wake_bat(state: &mut GameState, entity_id: u32) {
    let fly_speed = state.tuning.bat_fly_speed;
    if let Some(bat) = state.entity_mut(entity_id) {
        if matches!(bat.behavior, Behavior::Bat(BatPhase::Waiting { .. })) {
            bat.behavior = Behavior::Bat(BatPhase::Flying);
            bat.vel = Vec2::new(0.0, -fly_speed);
            log::debug!("bat {} takes flight", entity_id);
        }
    }
}

/// Start the forced death sequence for a just-hit entity
pub fn start_death(entity: &mut Entity) {
    entity.hitbox_enabled = false;
    entity.behavior = Behavior::Dying(match entity.kind {
        EntityKind::Zombie => {
            entity.vel = Vec2::ZERO;
            DeathAnim::ZombieFade {
                ticks_left: ZOMBIE_FADE_TICKS,
            }
        }
        EntityKind::Ghost => DeathAnim::GhostShrink {
            ticks_left: GHOST_DEATH_TICKS,
        },
        EntityKind::Witch => {
            entity.vel = Vec2::ZERO;
            entity.flip_y = true;
            DeathAnim::WitchSink {
                ticks_left: WITCH_SINK_TICKS,
            }
        }
        EntityKind::Bat => DeathAnim::BatShrink {
            ticks_left: BAT_DEATH_TICKS,
        },
    });
}

/// Advance a death sequence; returns false when the entity is fully gone
fn advance_death(
    pos: &mut Vec2,
    opacity: &mut f32,
    scale: &mut f32,
    anim: &mut DeathAnim,
    tuning: &Tuning,
) -> bool {
    match anim {
        DeathAnim::ZombieFade { ticks_left } => {
            *ticks_left -= 1;
            *opacity = *ticks_left as f32 / ZOMBIE_FADE_TICKS as f32;
            *ticks_left > 0
        }
        DeathAnim::GhostShrink { ticks_left } => {
            *ticks_left -= 1;
            let frac = *ticks_left as f32 / GHOST_DEATH_TICKS as f32;
            *opacity = frac;
            *scale = frac * tuning.ghost_scale;
            *ticks_left > 0
        }
        DeathAnim::WitchSink { ticks_left } => {
            *ticks_left -= 1;
            pos.y += WITCH_SINK_DEPTH / WITCH_SINK_TICKS as f32;
            if *ticks_left == 0 {
                *anim = DeathAnim::WitchFade {
                    ticks_left: WITCH_FADE_TICKS,
                };
            }
            true
        }
        DeathAnim::WitchFade { ticks_left } => {
            *ticks_left -= 1;
            *opacity = *ticks_left as f32 / WITCH_FADE_TICKS as f32;
            *ticks_left > 0
        }
        DeathAnim::BatShrink { ticks_left } => {
            *ticks_left -= 1;
            let frac = *ticks_left as f32 / BAT_DEATH_TICKS as f32;
            *opacity = frac;
            *scale = frac * tuning.bat_scale;
            *ticks_left > 0
        }
    }
}

fn in_bounds(pos: Vec2) -> bool {
    pos.x >= CULL_MIN_X && pos.x <= CULL_MAX_X && pos.y >= CULL_MIN_Y && pos.y <= CULL_MAX_Y
}

fn ease_out_sine(t: f32) -> f32 {
    (t * std::f32::consts::FRAC_PI_2).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn;
    use crate::sim::state::GameState;

    fn run_entity_ticks(state: &mut GameState, n: u32) {
        for _ in 0..n {
            update_entities(state, SIM_DT);
        }
    }

    #[test]
    fn test_ghost_machine_walks_rising_pausing_fading() {
        let mut state = GameState::new(5);
        spawn::spawn_ghost(&mut state);
        let id = state.entities[0].id;
        assert_eq!(state.graves.occupied_count(), 1);

        // First update initializes and starts rising
        update_entities(&mut state, SIM_DT);
        let ghost = state.entity(id).unwrap();
        assert!(matches!(
            ghost.behavior,
            Behavior::Ghost(GhostPhase::Rising { .. })
        ));
        assert!(ghost.opacity < 1.0);

        let rise_ticks = state.tuning.ghost_rise_ticks;
        run_entity_ticks(&mut state, rise_ticks);
        let ghost = state.entity(id).unwrap();
        let pause_ticks = match ghost.behavior {
            Behavior::Ghost(GhostPhase::Pausing { ticks_left }) => ticks_left,
            other => panic!("expected pausing, got {other:?}"),
        };
        assert_eq!(ghost.scale, state.tuning.ghost_scale);
        // One pausing tick may already have elapsed while we were counting
        assert!(pause_ticks + 1 >= state.tuning.ghost_pause_ticks.min);

        run_entity_ticks(&mut state, pause_ticks);
        let ghost = state.entity(id).unwrap();
        assert!(matches!(ghost.behavior, Behavior::Ghost(GhostPhase::Fading)));
        assert_eq!(ghost.vel.x, 0.0);

        // Fading out releases the grave and destroys the ghost
        run_entity_ticks(&mut state, 25);
        assert!(state.entity(id).is_none());
        assert_eq!(state.graves.occupied_count(), 0);
    }

    #[test]
    fn test_pausing_drift_is_quarter_of_rising_drift() {
        let mut state = GameState::new(11);
        spawn::spawn_ghost(&mut state);
        let id = state.entities[0].id;
        update_entities(&mut state, SIM_DT);
        let rising_drift = match state.entity(id).unwrap().behavior {
            Behavior::Ghost(GhostPhase::Rising { drift, .. }) => drift,
            other => panic!("expected rising, got {other:?}"),
        };

        let rise_ticks = state.tuning.ghost_rise_ticks;
        run_entity_ticks(&mut state, rise_ticks);
        let ghost = state.entity(id).unwrap();
        assert!(matches!(
            ghost.behavior,
            Behavior::Ghost(GhostPhase::Pausing { .. })
        ));
        assert_eq!(ghost.vel.x, rising_drift / 4.0);
    }

    #[test]
    fn test_bat_settles_waits_then_flies() {
        let mut state = GameState::new(3);
        state.bat_locked = false;
        spawn::spawn_bat(&mut state);
        let id = state.entities[0].id;

        // First update rolls the rest position and arms the wake timer
        update_entities(&mut state, SIM_DT);
        let rest_y = match state.entity(id).unwrap().behavior {
            Behavior::Bat(BatPhase::Waiting { rest_y }) => rest_y,
            other => panic!("expected waiting, got {other:?}"),
        };
        assert!(state
            .scheduler
            .has_pending(TaskKind::WakeBat { entity_id: id }));

        // Settles onto the rest line and holds there
        run_entity_ticks(&mut state, 60);
        assert_eq!(state.entity(id).unwrap().pos.y, rest_y);

        wake_bat(&mut state, id);
        let bat = state.entity(id).unwrap();
        assert!(matches!(bat.behavior, Behavior::Bat(BatPhase::Flying)));
        assert_eq!(bat.vel.y, -state.tuning.bat_fly_speed);

        // Flies off the top and is culled
        run_entity_ticks(&mut state, 60);
        assert!(state.entity(id).is_none());
    }

    #[test]
    fn test_wake_ignores_dead_or_dying_bats() {
        let mut state = GameState::new(3);
        state.bat_locked = false;
        spawn::spawn_bat(&mut state);
        let id = state.entities[0].id;
        update_entities(&mut state, SIM_DT);

        start_death(state.entity_mut(id).unwrap());
        wake_bat(&mut state, id);
        assert!(state.entity(id).unwrap().is_dying());

        // A wake for an entity that no longer exists is a no-op
        state.entities.clear();
        wake_bat(&mut state, id);
    }

    #[test]
    fn test_zombie_walks_off_bounds_and_is_culled() {
        let mut state = GameState::new(1);
        spawn::spawn_zombie(&mut state);
        assert_eq!(state.entities.len(), 1);

        // 780 px of travel at 50 px/s covers the widest possible crossing
        run_entity_ticks(&mut state, 16 * 60);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_witch_death_sinks_then_fades() {
        let mut state = GameState::new(9);
        spawn::spawn_witch(&mut state);
        let id = state.entities[0].id;
        let start_y = state.entity(id).unwrap().pos.y;

        start_death(state.entity_mut(id).unwrap());
        let witch = state.entity(id).unwrap();
        assert!(witch.flip_y);
        assert!(!witch.hitbox_enabled);

        run_entity_ticks(&mut state, WITCH_SINK_TICKS);
        let witch = state.entity(id).unwrap();
        assert!((witch.pos.y - (start_y + WITCH_SINK_DEPTH)).abs() < 1.0);

        run_entity_ticks(&mut state, WITCH_FADE_TICKS);
        assert!(state.entity(id).is_none());
    }
}
