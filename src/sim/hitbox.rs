//! Broad-phase overlap testing
//!
//! Per-kind hurtbox shapes in world space plus the pair sweep the collision
//! resolver consumes. Shapes are deliberately coarse: a circle for the
//! balloon, ghost, and bat, an offset rectangle for zombie and witch. A
//! zombie that entered from the right is mirrored, so its hurtbox offset
//! flips with it.

use glam::Vec2;

use super::state::{Entity, EntityKind, Projectile};
use crate::consts::BALLOON_RADIUS;

/// A world-space collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { min: Vec2, max: Vec2 },
}

/// Zombie hurtbox: 60x40 around the head, nudged toward the facing side
const ZOMBIE_HALF: Vec2 = Vec2::new(30.0, 20.0);
const ZOMBIE_OFFSET: Vec2 = Vec2::new(10.0, -55.0);
/// Witch hurtbox: 50x80 below her top-anchored position
const WITCH_HALF: Vec2 = Vec2::new(25.0, 40.0);
const WITCH_OFFSET: Vec2 = Vec2::new(0.0, 50.0);
/// Ghost hurtbox: circle over the sheet's center of mass
const GHOST_RADIUS: f32 = 20.0;
const GHOST_OFFSET: Vec2 = Vec2::new(0.0, -30.0);
const BAT_RADIUS: f32 = 12.5;

/// Hurtbox for a live entity
pub fn entity_shape(entity: &Entity) -> Shape {
    match entity.kind {
        EntityKind::Zombie => {
            let mut offset = ZOMBIE_OFFSET;
            if entity.flip_x {
                offset.x = -offset.x;
            }
            let center = entity.pos + offset;
            Shape::Rect {
                min: center - ZOMBIE_HALF,
                max: center + ZOMBIE_HALF,
            }
        }
        EntityKind::Witch => {
            let center = entity.pos + WITCH_OFFSET;
            Shape::Rect {
                min: center - WITCH_HALF,
                max: center + WITCH_HALF,
            }
        }
        EntityKind::Ghost => Shape::Circle {
            center: entity.pos + GHOST_OFFSET,
            radius: GHOST_RADIUS,
        },
        EntityKind::Bat => Shape::Circle {
            center: entity.pos,
            radius: BAT_RADIUS,
        },
    }
}

/// Balloon collision shape
pub fn projectile_shape(projectile: &Projectile) -> Shape {
    Shape::Circle {
        center: projectile.pos,
        radius: BALLOON_RADIUS,
    }
}

/// Shape intersection test
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (
            Shape::Circle {
                center: ca,
                radius: ra,
            },
            Shape::Circle {
                center: cb,
                radius: rb,
            },
        ) => ca.distance_squared(*cb) <= (ra + rb) * (ra + rb),
        (Shape::Circle { center, radius }, Shape::Rect { min, max })
        | (Shape::Rect { min, max }, Shape::Circle { center, radius }) => {
            let closest = center.clamp(*min, *max);
            center.distance_squared(closest) <= radius * radius
        }
        (Shape::Rect { min: a0, max: a1 }, Shape::Rect { min: b0, max: b1 }) => {
            a0.x <= b1.x && a1.x >= b0.x && a0.y <= b1.y && a1.y >= b0.y
        }
    }
}

/// Report every intersecting (projectile, entity) id pair this tick. The
/// resolver applies all gating; this is geometry only.
pub fn detect_pairs(projectiles: &[Projectile], entities: &[Entity]) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for projectile in projectiles {
        let p_shape = projectile_shape(projectile);
        for entity in entities {
            if overlaps(&p_shape, &entity_shape(entity)) {
                pairs.push((projectile.id, entity.id));
            }
        }
    }
    pairs
}
