//! Collision detection and bulk resolution between entity groups
//!
//! Resolution only marks entities dead and reports which pairs matched;
//! scoring, damage and spawning are left to the caller.

use super::arena::{Arena, SlotId};
use super::entity::{Body, Collidable, HitShape};
use crate::rects_overlap;

/// A matched pair from `resolve_group`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub a: SlotId,
    pub b: SlotId,
}

/// Overlap test between two bodies
///
/// Two circular bodies (rocks, the ship) are tested by center distance.
/// Anything involving a rectangle falls back to bounding-box overlap.
pub fn intersects(a: &Body, b: &Body) -> bool {
    match (a.shape, b.shape) {
        (HitShape::Circle { radius: ra }, HitShape::Circle { radius: rb }) => {
            let reach = ra + rb;
            a.center().distance_squared(b.center()) < reach * reach
        }
        _ => rects_overlap(a.pos, a.size, b.pos, b.size),
    }
}

/// Match every live entity in `group_a` against the live entities of `group_b`
///
/// Each A entity consumes at most one B entity (its first match). Matched
/// entities are marked dead according to the destroy flags; a B entity killed
/// this way is invisible to the remaining A entities.
pub fn resolve_group<A: Collidable, B: Collidable>(
    group_a: &mut Arena<A>,
    group_b: &mut Arena<B>,
    destroy_a: bool,
    destroy_b: bool,
) -> Vec<Hit> {
    let mut hits = Vec::new();

    for (a_id, a) in group_a.iter_mut() {
        let a_body = *a.body();
        let found = group_b
            .iter()
            .find(|(_, b)| intersects(&a_body, b.body()))
            .map(|(b_id, _)| b_id);

        if let Some(b_id) = found {
            if destroy_a {
                a.body_mut().alive = false;
            }
            if destroy_b {
                group_b.kill(b_id);
            }
            hits.push(Hit { a: a_id, b: b_id });
        }
    }

    hits
}

/// Match a single entity against a group; every overlapping member matches once
pub fn resolve_against<B: Collidable>(single: &Body, group: &mut Arena<B>, destroy_group: bool) -> Vec<SlotId> {
    if !single.alive {
        return Vec::new();
    }

    let matched: Vec<SlotId> = group
        .iter()
        .filter(|(_, b)| intersects(single, b.body()))
        .map(|(id, _)| id)
        .collect();

    if destroy_group {
        for &id in &matched {
            group.kill(id);
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Obstacle, PowerUp, PowerUpKind, Projectile};
    use glam::Vec2;

    fn rock_at(center: Vec2, width: f32) -> Obstacle {
        let size = Vec2::splat(width);
        Obstacle::new(0, size, center - size / 2.0, Vec2::ZERO, 0.0)
    }

    fn bullet_at(center: Vec2) -> Projectile {
        Projectile::new(center.x, center.y - 10.0, Vec2::new(6.0, 20.0))
    }

    #[test]
    fn test_circle_overlap() {
        let a = rock_at(Vec2::new(0.0, 0.0), 50.0); // r = 20
        let b = rock_at(Vec2::new(39.0, 0.0), 50.0);
        let c = rock_at(Vec2::new(41.0, 0.0), 50.0);
        assert!(intersects(&a.body, &b.body));
        assert!(!intersects(&a.body, &c.body));
    }

    #[test]
    fn test_circle_ignores_rect_corners() {
        // Boxes overlap at the corners but the circles do not touch
        let a = rock_at(Vec2::new(0.0, 0.0), 50.0);
        let b = rock_at(Vec2::new(45.0, 45.0), 50.0);
        assert!(rects_overlap(a.body.pos, a.body.size, b.body.pos, b.body.size));
        assert!(!intersects(&a.body, &b.body));
    }

    #[test]
    fn test_rect_overlap_for_mixed_shapes() {
        let rock = rock_at(Vec2::new(100.0, 100.0), 50.0);
        let hit = bullet_at(Vec2::new(120.0, 100.0));
        let miss = bullet_at(Vec2::new(130.0, 100.0));
        assert!(intersects(&hit.body, &rock.body));
        assert!(!intersects(&miss.body, &rock.body));
    }

    #[test]
    fn test_projectile_consumed_once() {
        let mut bullets = Arena::new();
        let mut rocks = Arena::new();
        let b = bullets.insert(bullet_at(Vec2::new(100.0, 100.0)));
        let r1 = rocks.insert(rock_at(Vec2::new(100.0, 100.0), 50.0));
        let r2 = rocks.insert(rock_at(Vec2::new(102.0, 100.0), 50.0));

        let hits = resolve_group(&mut bullets, &mut rocks, true, true);
        assert_eq!(hits, vec![Hit { a: b, b: r1 }]);
        assert!(!bullets.is_alive(b));
        assert!(!rocks.is_alive(r1));
        assert!(rocks.is_alive(r2));
    }

    #[test]
    fn test_destroyed_target_not_matched_twice() {
        let mut bullets = Arena::new();
        let mut rocks = Arena::new();
        let b1 = bullets.insert(bullet_at(Vec2::new(100.0, 100.0)));
        let b2 = bullets.insert(bullet_at(Vec2::new(101.0, 100.0)));
        let r = rocks.insert(rock_at(Vec2::new(100.0, 100.0), 50.0));

        let hits = resolve_group(&mut bullets, &mut rocks, true, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], Hit { a: b1, b: r });
        // Second bullet keeps flying
        assert!(bullets.is_alive(b2));
    }

    #[test]
    fn test_destroy_flags_respected() {
        let mut bullets = Arena::new();
        let mut rocks = Arena::new();
        let b = bullets.insert(bullet_at(Vec2::new(100.0, 100.0)));
        let r = rocks.insert(rock_at(Vec2::new(100.0, 100.0), 50.0));

        let hits = resolve_group(&mut bullets, &mut rocks, false, false);
        assert_eq!(hits.len(), 1);
        assert!(bullets.is_alive(b));
        assert!(rocks.is_alive(r));
    }

    #[test]
    fn test_resolve_against_matches_all() {
        let mut pickups = Arena::new();
        let probe = rock_at(Vec2::new(100.0, 100.0), 50.0);
        let a = pickups.insert(PowerUp::new(Vec2::new(90.0, 100.0), PowerUpKind::Heal, Vec2::splat(20.0)));
        let b = pickups.insert(PowerUp::new(Vec2::new(110.0, 100.0), PowerUpKind::MultiShot, Vec2::splat(20.0)));
        let far = pickups.insert(PowerUp::new(Vec2::new(300.0, 100.0), PowerUpKind::Heal, Vec2::splat(20.0)));

        let matched = resolve_against(&probe.body, &mut pickups, true);
        assert_eq!(matched, vec![a, b]);
        assert!(!pickups.is_alive(a));
        assert!(pickups.is_alive(far));
    }
}
