//! Session state and core simulation types
//!
//! The whole session is one serializable struct: HUD counters, the aim
//! charge, live entities and balloons, the grave registry, the RNG stream,
//! and the pending task queue. Exactly one component writes each piece
//! (spawner creates entities, the aim controller spends ammo, the collision
//! resolver awards it back); everything else reads.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::schedule::{Scheduler, TaskKind};
use crate::ms_to_ticks;
use crate::tuning::Tuning;

/// Creature type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Zombie,
    Ghost,
    Witch,
    Bat,
}

impl EntityKind {
    /// Specials share a spawn generator and a live-count cap; zombies have
    /// their own
    pub fn is_special(self) -> bool {
        !matches!(self, EntityKind::Zombie)
    }
}

/// Ghost behavior machine: rising -> pausing -> fading (then destroyed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GhostPhase {
    /// Climbing out of the grave; opacity/scale ease in with rise progress
    Rising { target_y: f32, drift: f32 },
    /// Hovering at full height. The only phase in which a ghost can be hit.
    Pausing { ticks_left: u32 },
    /// Drifting up and thinning out until gone
    Fading,
}

/// Bat behavior machine: waiting -> flying
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BatPhase {
    /// Settling to, then holding, its rest position until the wake timer fires
    Waiting { rest_y: f32 },
    /// Climbing off the top of the screen
    Flying,
}

/// Forced death sequence, started by a resolved hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathAnim {
    /// Stop and fade in place
    ZombieFade { ticks_left: u32 },
    /// Shrink and fade simultaneously
    GhostShrink { ticks_left: u32 },
    /// Plummet belly-up, then fade
    WitchSink { ticks_left: u32 },
    WitchFade { ticks_left: u32 },
    /// Shrink and fade simultaneously
    BatShrink { ticks_left: u32 },
}

/// Per-entity behavior state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Not yet initialized; resolved on the entity's first update
    Dormant,
    /// Constant-velocity travel until culled off-bounds (zombies, witches)
    Drift,
    Ghost(GhostPhase),
    Bat(BatPhase),
    /// Preempts the normal machine; entity is destroyed when it completes
    Dying(DeathAnim),
}

/// A live creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cleared on death (and en masse at game over) so a creature resolves
    /// at most one hit
    pub hitbox_enabled: bool,
    pub behavior: Behavior,
    /// Score granted on a hit (bats grant ammo instead)
    pub points: u32,
    /// Back-reference to the grave this ghost rose from
    pub grave_slot: Option<usize>,
    pub scale: f32,
    pub opacity: f32,
    /// Entered from the right; presentation mirrors the sprite and the
    /// hitbox offset flips with it
    pub flip_x: bool,
    /// Witches flip belly-up while sinking
    pub flip_y: bool,
}

impl Entity {
    pub fn is_dying(&self) -> bool {
        matches!(self.behavior, Behavior::Dying(_))
    }
}

/// A thrown balloon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Effective charge at release; gates which creatures it can hit
    pub power: u32,
    /// True only while still ascending and unresolved
    pub can_damage: bool,
    /// False once a hit resolved; the balloon lingers through its pop
    pub active: bool,
    /// Remaining pop-animation ticks after a hit
    pub pop_ticks: Option<u32>,
    pub scale: f32,
    pub opacity: f32,
}

/// One grave anchor a ghost may rise from
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GraveSlot {
    pub pos: Vec2,
    pub occupied: bool,
}

/// Fixed registry of grave anchors; at most one ghost per slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraveSlots {
    slots: Vec<GraveSlot>,
}

impl Default for GraveSlots {
    fn default() -> Self {
        Self {
            slots: vec![
                GraveSlot {
                    pos: Vec2::new(160.0, 120.0),
                    occupied: false,
                },
                GraveSlot {
                    pos: Vec2::new(568.0, 120.0),
                    occupied: false,
                },
            ],
        }
    }
}

impl GraveSlots {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GraveSlot> {
        self.slots.get(index)
    }

    /// Indices of slots with no ghost
    pub fn free_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.occupied)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn occupy(&mut self, index: usize) {
        self.slots[index].occupied = true;
    }

    pub fn release(&mut self, index: usize) {
        self.slots[index].occupied = false;
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.occupied).count()
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// RNG stream; every roll in the session comes from here
    pub rng: Pcg32,
    pub tuning: Tuning,

    pub score: u32,
    pub level: u32,
    pub ammo: u32,

    pub is_aiming: bool,
    /// Charge level, 0-100 triangle wave while aiming
    pub power: u32,
    /// +1 climbing, -1 falling; flips exactly at the bounds
    pub power_dir: i32,
    /// Post-throw refractory lock; releases are refused while set
    pub fire_locked: bool,
    /// Throw origin / reticle x, following the pointer
    pub hand_x: f32,

    pub is_paused: bool,
    pub is_game_over: bool,
    /// Bats cannot spawn until the unlock task fires
    pub bat_locked: bool,

    pub time_ticks: u64,
    pub entities: Vec<Entity>,
    pub projectiles: Vec<Projectile>,
    pub graves: GraveSlots,
    pub scheduler: Scheduler,
    next_id: u32,
}

impl GameState {
    /// Start a session with default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Start a session with an explicit tuning sheet
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut scheduler = Scheduler::default();
        scheduler.schedule_repeating(tuning.zombie_interval_ms, TaskKind::SpawnZombie, &mut rng);
        scheduler.schedule_repeating(tuning.special_interval_ms, TaskKind::SpawnSpecial, &mut rng);

        let bat_locked = if tuning.debug_unlock_bat {
            false
        } else {
            scheduler.schedule_once(ms_to_ticks(tuning.bat_unlock_ms), TaskKind::UnlockBat);
            true
        };

        Self {
            seed,
            rng,
            ammo: tuning.initial_ammo,
            tuning,
            score: 0,
            level: 1,
            is_aiming: false,
            power: 0,
            power_dir: 1,
            fire_locked: false,
            hand_x: crate::consts::WORLD_WIDTH / 2.0,
            is_paused: false,
            is_game_over: false,
            bat_locked,
            time_ticks: 0,
            entities: Vec::new(),
            projectiles: Vec::new(),
            graves: GraveSlots::default(),
            scheduler,
            next_id: 1,
        }
    }

    /// Allocate a new entity/projectile id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn projectile_mut(&mut self, id: u32) -> Option<&mut Projectile> {
        self.projectiles.iter_mut().find(|p| p.id == id)
    }

    /// Live zombies (dying ones no longer count against the spawn cap)
    pub fn zombie_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::Zombie && !e.is_dying())
            .count()
    }

    /// Live specials (ghost + witch + bat), gated by the spawn cap
    pub fn special_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind.is_special() && !e.is_dying())
            .count()
    }

    /// At most one bat may be alive at a time
    pub fn bat_alive(&self) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == EntityKind::Bat && !e.is_dying())
    }

    /// Live ghosts still holding a grave slot
    pub fn ghost_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::Ghost && e.grave_slot.is_some())
            .count()
    }

    // === Economy (the only mutation paths for score and ammo) ===

    /// Score only ever increases
    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Bat reward
    pub fn refund_ammo(&mut self, amount: u32) {
        self.ammo += amount;
    }

    /// Spend one balloon; refused at zero
    pub fn try_spend_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_initial_values() {
        let state = GameState::new(1);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.ammo, 10);
        assert_eq!(state.power, 0);
        assert_eq!(state.power_dir, 1);
        assert!(!state.is_aiming);
        assert!(!state.is_game_over);
        assert!(state.bat_locked);
        // Both generators plus the bat unlock are queued
        assert_eq!(state.scheduler.pending(), 3);
    }

    #[test]
    fn test_debug_tuning_unlocks_bat_immediately() {
        let tuning = Tuning {
            debug_unlock_bat: true,
            ..Tuning::default()
        };
        let state = GameState::with_tuning(1, tuning);
        assert!(!state.bat_locked);
        assert!(!state.scheduler.has_pending(TaskKind::UnlockBat));
    }

    #[test]
    fn test_ammo_floor() {
        let mut state = GameState::new(1);
        state.ammo = 1;
        assert!(state.try_spend_ammo());
        assert_eq!(state.ammo, 0);
        assert!(!state.try_spend_ammo());
        assert_eq!(state.ammo, 0);
    }

    #[test]
    fn test_grave_registry_occupancy() {
        let mut graves = GraveSlots::default();
        assert_eq!(graves.free_indices(), vec![0, 1]);
        graves.occupy(1);
        assert_eq!(graves.free_indices(), vec![0]);
        assert_eq!(graves.occupied_count(), 1);
        graves.release(1);
        assert_eq!(graves.occupied_count(), 0);
    }

    #[test]
    fn test_state_serde_roundtrip() {
        let state = GameState::new(99);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 99);
        assert_eq!(back.ammo, state.ammo);
        assert_eq!(back.scheduler.pending(), state.scheduler.pending());
    }
}
