//! Power-gated hit resolution
//!
//! For each overlapping pair the resolver first applies the hard guards
//! (balloon still damaging and active, hurtbox enabled), then the per-kind
//! power window. An accepted hit immediately disables both participants, so
//! a pair resolves at most once no matter how many ticks they keep
//! overlapping.

use super::entity;
use super::state::{Behavior, EntityKind, GameState, GhostPhase};

/// Pop animation length after a hit (ticks); the balloon still counts
/// against game-over until it finishes
pub const POP_TICKS: u32 = 12;

/// Resolve every reported overlap pair against the current state
pub fn resolve_hits(state: &mut GameState, pairs: &[(u32, u32)]) {
    for &(projectile_id, entity_id) in pairs {
        resolve_pair(state, projectile_id, entity_id);
    }
}

fn resolve_pair(state: &mut GameState, projectile_id: u32, entity_id: u32) {
    let Some(p_idx) = state.projectiles.iter().position(|p| p.id == projectile_id) else {
        return;
    };
    let Some(e_idx) = state.entities.iter().position(|e| e.id == entity_id) else {
        return;
    };

    {
        let projectile = &state.projectiles[p_idx];
        let entity = &state.entities[e_idx];
        if !projectile.can_damage || !projectile.active || !entity.hitbox_enabled {
            return;
        }
        if !window_accepts(state, projectile.power, entity_id) {
            // Pass-through: both sides stay live
            return;
        }
    }

    // Balloon pops in place
    let projectile = &mut state.projectiles[p_idx];
    projectile.can_damage = false;
    projectile.active = false;
    projectile.vel = glam::Vec2::ZERO;
    projectile.pop_ticks = Some(POP_TICKS);

    // Creature starts its death sequence; a downed ghost frees its grave
    // right away so the spawner can reuse it
    let entity = &mut state.entities[e_idx];
    entity::start_death(entity);
    let kind = entity.kind;
    let points = entity.points;
    if let Some(slot) = entity.grave_slot.take() {
        state.graves.release(slot);
    }

    if kind == EntityKind::Bat {
        let reward = state.tuning.bat_reward;
        state.refund_ammo(reward);
        log::debug!("bat {entity_id} hit: +{reward} ammo");
    } else {
        state.add_score(points);
        log::debug!("{kind:?} {entity_id} hit: +{points} points");
    }
}

/// Per-kind damage window: zombies and ghosts only accept a band of throw
/// power, and ghosts only while pausing; witches and bats always accept
fn window_accepts(state: &GameState, power: u32, entity_id: u32) -> bool {
    let Some(entity) = state.entity(entity_id) else {
        return false;
    };
    match entity.kind {
        EntityKind::Zombie => {
            let w = state.tuning.zombie_window;
            (w.min..=w.max).contains(&power)
        }
        EntityKind::Ghost => {
            let w = state.tuning.ghost_window;
            (w.min..=w.max).contains(&power)
                && matches!(entity.behavior, Behavior::Ghost(GhostPhase::Pausing { .. }))
        }
        EntityKind::Witch | EntityKind::Bat => true,
    }
}
