//! Charge-and-release throw mechanic
//!
//! Press starts the aim; while aiming the power value runs a triangle wave
//! between 0 and 100; release either cancels (a twitch below the minimum
//! charge) or spends one balloon. A one-tick refractory lock keeps a single
//! release edge from firing twice.

use glam::Vec2;

use super::schedule::TaskKind;
use super::state::{GameState, Projectile};
use crate::consts::*;
use crate::ms_to_ticks;

/// Press edge: start charging if a throw is even possible
pub fn press(state: &mut GameState) {
    if state.ammo > 0 && !state.is_game_over {
        state.is_aiming = true;
        state.power = 0;
        state.power_dir = 1;
    }
}

/// One tick of charge: triangle wave with direction flips exactly at the
/// bounds
pub fn advance_charge(state: &mut GameState) {
    if !state.is_aiming {
        return;
    }
    let next = state.power as i32 + state.power_dir * state.tuning.power_step as i32;
    if next >= 100 {
        state.power = 100;
        state.power_dir = -1;
    } else if next <= 0 {
        state.power = 0;
        state.power_dir = 1;
    } else {
        state.power = next as u32;
    }
}

/// Release edge: cancel, refuse, or throw. Returns the new projectile's id
/// when a throw actually happens.
pub fn release(state: &mut GameState) -> Option<u32> {
    if !state.is_aiming || state.is_game_over {
        return None;
    }
    // Refractory lock: the release is swallowed, the aim continues
    if state.fire_locked {
        return None;
    }

    // Below minimum charge: a mis-fire, not a throw
    if state.power < state.tuning.min_charge {
        state.is_aiming = false;
        state.power = 0;
        return None;
    }

    if !state.try_spend_ammo() {
        state.is_aiming = false;
        state.power = 0;
        return None;
    }

    let effective = state.power.max(state.tuning.power_floor);
    let speed = effective as f32 / 100.0 * MAX_THROW_SPEED;

    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos: Vec2::new(state.hand_x, HAND_Y),
        vel: Vec2::new(0.0, -speed),
        power: effective,
        can_damage: true,
        active: true,
        pop_ticks: None,
        scale: 0.5,
        opacity: 1.0,
    });

    state.fire_locked = true;
    state
        .scheduler
        .schedule_once(ms_to_ticks(state.tuning.fire_lock_ms), TaskKind::ClearFireLock);

    state.is_aiming = false;
    state.power = 0;
    log::debug!("balloon {id} thrown at power {effective}");
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_triangle_wave_flips_at_bounds() {
        let mut state = GameState::new(1);
        press(&mut state);
        assert!(state.is_aiming);

        let mut seen_power = Vec::new();
        for _ in 0..140 {
            advance_charge(&mut state);
            seen_power.push((state.power, state.power_dir));
        }

        assert!(seen_power.iter().all(|&(p, _)| p <= 100));
        // Direction only ever flips at a bound
        for pair in seen_power.windows(2) {
            if pair[0].1 != pair[1].1 {
                assert!(pair[1].0 == 0 || pair[1].0 == 100);
            }
        }
        assert!(seen_power.iter().any(|&(p, _)| p == 100));
    }

    #[test]
    fn test_release_at_mid_charge_throws_scaled_balloon() {
        let mut state = GameState::new(1);
        press(&mut state);
        state.power = 50;

        let id = release(&mut state).expect("throw");
        assert_eq!(state.ammo, 9);
        assert!(!state.is_aiming);
        assert_eq!(state.power, 0);

        let balloon = state.projectiles.iter().find(|p| p.id == id).unwrap();
        assert_eq!(balloon.vel, Vec2::new(0.0, -500.0));
        assert!(balloon.can_damage);
        assert_eq!(balloon.power, 50);
    }

    #[test]
    fn test_release_below_min_charge_is_a_misfire() {
        let mut state = GameState::new(1);
        press(&mut state);
        state.power = 3;

        assert!(release(&mut state).is_none());
        assert_eq!(state.ammo, 10);
        assert!(!state.is_aiming);
        assert_eq!(state.power, 0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_low_intentional_throws_floor_to_minimum_effect() {
        let mut state = GameState::new(1);
        press(&mut state);
        state.power = 8;

        let id = release(&mut state).expect("throw");
        let balloon = state.projectiles.iter().find(|p| p.id == id).unwrap();
        // max(20, 8) / 100 * 1000
        assert_eq!(balloon.vel.y, -200.0);
        assert_eq!(balloon.power, 20);
    }

    #[test]
    fn test_refractory_lock_swallows_double_release() {
        let mut state = GameState::new(1);
        press(&mut state);
        state.power = 60;
        assert!(release(&mut state).is_some());

        // Same release edge arriving again within the lock window
        press(&mut state);
        state.power = 60;
        assert!(release(&mut state).is_none());
        assert_eq!(state.ammo, 9);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_press_refused_without_ammo_or_after_game_over() {
        let mut state = GameState::new(1);
        state.ammo = 0;
        press(&mut state);
        assert!(!state.is_aiming);

        let mut state = GameState::new(1);
        state.is_game_over = true;
        press(&mut state);
        assert!(!state.is_aiming);
    }
}
