//! Timed spawn decisions
//!
//! Two independent generators fire from the task queue: the zombie generator
//! keeps a small walking population topped up, and the special generator
//! rolls one die per cycle for ghost/witch/bat. All refusals (cap reached,
//! no free grave, bat already out, bat still locked) silently waste the
//! cycle; nothing is retried.

use glam::Vec2;
use rand::Rng;

use super::state::{Behavior, Entity, EntityKind, GameState};
use crate::consts::*;

/// Zombie generator cycle: top up the walking population
pub fn zombie_generator(state: &mut GameState) {
    if state.is_game_over {
        return;
    }
    if state.zombie_count() >= state.tuning.max_zombies {
        return;
    }
    spawn_zombie(state);
}

/// Spawn one zombie walking in from a random screen edge
pub fn spawn_zombie(state: &mut GameState) {
    let from_left = state.rng.random_bool(0.5);
    let x = if from_left { -10.0 } else { 730.0 };
    let speed = if from_left {
        state.tuning.zombie_speed
    } else {
        -state.tuning.zombie_speed
    };

    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        kind: EntityKind::Zombie,
        pos: Vec2::new(x, GROUND_Y),
        vel: Vec2::new(speed, 0.0),
        hitbox_enabled: true,
        behavior: Behavior::Drift,
        points: state.tuning.zombie_points,
        grave_slot: None,
        scale: state.tuning.zombie_scale,
        opacity: 1.0,
        flip_x: !from_left,
        flip_y: false,
    });
    log::debug!("zombie {id} shambles in from the {}", side_name(from_left));
}

/// Special generator cycle: one roll decides ghost, witch, bat, or nothing
pub fn special_generator(state: &mut GameState) {
    if state.is_game_over {
        return;
    }
    if state.special_count() >= state.tuning.special_cap {
        return;
    }

    let roll = state.rng.random_range(1..=100);
    if roll < state.tuning.ghost_roll_under {
        spawn_ghost(state);
    } else if roll < state.tuning.witch_roll_under {
        spawn_witch(state);
    } else if !state.bat_locked {
        spawn_bat(state);
    }
    // Locked bat band: the roll is wasted for this cycle
}

/// Spawn a ghost at a free grave, if any; marks the slot occupied. Behavior
/// initializes lazily on its first update.
pub fn spawn_ghost(state: &mut GameState) {
    let free = state.graves.free_indices();
    if free.is_empty() {
        return;
    }
    let slot = free[state.rng.random_range(0..free.len())];
    state.graves.occupy(slot);
    let pos = state.graves.get(slot).map(|g| g.pos).unwrap_or_default();

    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        kind: EntityKind::Ghost,
        pos,
        vel: Vec2::ZERO,
        hitbox_enabled: true,
        behavior: Behavior::Dormant,
        points: state.tuning.ghost_points,
        grave_slot: Some(slot),
        scale: 0.0,
        opacity: 0.0,
        flip_x: false,
        flip_y: false,
    });
    log::debug!("ghost {id} rises from grave {slot}");
}

/// Spawn a witch crossing the top of the screen
pub fn spawn_witch(state: &mut GameState) {
    let from_left = state.rng.random_bool(0.5);
    let x = if from_left { -10.0 } else { 730.0 };
    let speed = if from_left {
        state.tuning.witch_speed
    } else {
        -state.tuning.witch_speed
    };

    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        kind: EntityKind::Witch,
        pos: Vec2::new(x, 10.0),
        vel: Vec2::new(speed, 0.0),
        hitbox_enabled: true,
        behavior: Behavior::Drift,
        points: state.tuning.witch_points,
        grave_slot: None,
        scale: state.tuning.witch_scale,
        opacity: 1.0,
        flip_x: !from_left,
        flip_y: false,
    });
    log::debug!("witch {id} swoops in from the {}", side_name(from_left));
}

/// Spawn a bat just above the screen, dropping toward a random rest
/// position. Refused outright if one is already alive.
pub fn spawn_bat(state: &mut GameState) {
    if state.bat_alive() {
        return;
    }
    let x = state
        .rng
        .random_range(state.tuning.bat_rest_x.min..=state.tuning.bat_rest_x.max) as f32;

    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        kind: EntityKind::Bat,
        pos: Vec2::new(x, -30.0),
        vel: Vec2::ZERO,
        hitbox_enabled: true,
        behavior: Behavior::Dormant,
        points: 0,
        grave_slot: None,
        scale: state.tuning.bat_scale,
        opacity: 1.0,
        flip_x: false,
        flip_y: false,
    });
    log::debug!("bat {id} drops in at x={x}");
}

fn side_name(from_left: bool) -> &'static str {
    if from_left { "left" } else { "right" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zombie_generator_respects_population_cap() {
        let mut state = GameState::new(1);
        zombie_generator(&mut state);
        zombie_generator(&mut state);
        assert_eq!(state.zombie_count(), 2);

        // Third cycle is a no-op
        zombie_generator(&mut state);
        assert_eq!(state.zombie_count(), 2);
    }

    #[test]
    fn test_ghost_slots_never_shared() {
        let mut state = GameState::new(2);
        spawn_ghost(&mut state);
        spawn_ghost(&mut state);
        assert_eq!(state.ghost_count(), 2);
        assert_eq!(state.graves.occupied_count(), 2);

        // Both graves held: the next ghost is silently skipped
        spawn_ghost(&mut state);
        assert_eq!(state.ghost_count(), 2);

        let slots: Vec<_> = state.entities.iter().filter_map(|e| e.grave_slot).collect();
        assert_ne!(slots[0], slots[1]);
    }

    #[test]
    fn test_at_most_one_bat() {
        let mut state = GameState::new(3);
        spawn_bat(&mut state);
        spawn_bat(&mut state);
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_special_generator_honors_cap() {
        let mut state = GameState::new(4);
        state.tuning.special_cap = 1;
        spawn_witch(&mut state);
        let before = state.entities.len();
        for _ in 0..20 {
            special_generator(&mut state);
        }
        assert_eq!(state.entities.len(), before);
    }

    #[test]
    fn test_locked_bat_band_wastes_the_roll() {
        let mut state = GameState::new(5);
        assert!(state.bat_locked);
        // Enough cycles that the bat band (roll >= 85) certainly comes up
        for _ in 0..200 {
            special_generator(&mut state);
            // Burn off ghosts/witches so the cap never interferes
            state.entities.clear();
            state.graves.release(0);
            state.graves.release(1);
        }
        assert!(!state.entities.iter().any(|e| e.kind == EntityKind::Bat));
    }

    #[test]
    fn test_generators_idle_after_game_over() {
        let mut state = GameState::new(6);
        state.is_game_over = true;
        zombie_generator(&mut state);
        special_generator(&mut state);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_witch_flies_toward_the_opposite_edge() {
        let mut state = GameState::new(7);
        spawn_witch(&mut state);
        let witch = &state.entities[0];
        if witch.pos.x < 0.0 {
            assert!(witch.vel.x > 0.0);
            assert!(!witch.flip_x);
        } else {
            assert!(witch.vel.x < 0.0);
            assert!(witch.flip_x);
        }
    }
}
