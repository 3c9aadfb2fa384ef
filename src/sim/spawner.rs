//! Randomized creation of rocks and power-ups

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Obstacle, PowerUp, PowerUpKind};
use crate::assets::SpriteAtlas;
use crate::consts::*;

/// Spawns entities with randomized placement; owns the gameplay RNG
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    rock_sizes: Vec<Vec2>,
    heal_size: Vec2,
    multi_shot_size: Vec2,
    screen_width: i32,
}

impl Spawner {
    pub fn new(seed: u64, atlas: &SpriteAtlas, screen_width: f32) -> Self {
        let mut rock_sizes = atlas.rocks.clone();
        if rock_sizes.is_empty() {
            rock_sizes.push(SpriteAtlas::default().rocks[0]);
        }
        Self {
            rng: Pcg32::seed_from_u64(seed),
            rock_sizes,
            heal_size: atlas.heal,
            multi_shot_size: atlas.multi_shot,
            screen_width: (screen_width as i32).max(1),
        }
    }

    fn range(&mut self, (lo, hi): (i32, i32)) -> f32 {
        self.rng.random_range(lo..hi) as f32
    }

    /// Fresh rock above the visible area
    pub fn spawn_obstacle(&mut self) -> Obstacle {
        let sprite = self.rng.random_range(0..self.rock_sizes.len());
        let mut obstacle = Obstacle::new(sprite, self.rock_sizes[sprite], Vec2::ZERO, Vec2::ZERO, 0.0);
        self.recycle(&mut obstacle);
        obstacle
    }

    /// Re-randomize position, velocity and spin in place
    pub fn recycle(&mut self, obstacle: &mut Obstacle) {
        obstacle.rotation_step = self.range(OBSTACLE_ROTATION_STEP);
        obstacle.body.pos = Vec2::new(self.range((0, self.screen_width)), self.range(OBSTACLE_SPAWN_Y));
        obstacle.body.vel = Vec2::new(self.range(OBSTACLE_SPEED_X), self.range(OBSTACLE_SPEED_Y));
    }

    /// Roll the drop chance for a rock destroyed by a projectile
    pub fn roll_drop(&mut self, chance: f64) -> bool {
        self.rng.random_bool(chance.clamp(0.0, 1.0))
    }

    /// Power-up of a uniformly chosen kind, centered on `at`
    pub fn spawn_power_up(&mut self, at: Vec2) -> PowerUp {
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        let size = match kind {
            PowerUpKind::Heal => self.heal_size,
            PowerUpKind::MultiShot => self.multi_shot_size,
        };
        PowerUp::new(at, kind, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner(seed: u64) -> Spawner {
        Spawner::new(seed, &SpriteAtlas::default(), 500.0)
    }

    #[test]
    fn test_spawned_obstacles_in_range() {
        let mut s = spawner(7);
        for _ in 0..500 {
            let o = s.spawn_obstacle();
            assert!((0.0..500.0).contains(&o.body.pos.x));
            assert!((-200.0..-80.0).contains(&o.body.pos.y));
            assert!((-3.0..3.0).contains(&o.body.vel.x));
            assert!((2.0..10.0).contains(&o.body.vel.y));
            assert!((-3.0..3.0).contains(&o.rotation_step));
            assert_eq!(o.body.vel.y.fract(), 0.0);
            assert!(o.body.alive);
        }
    }

    #[test]
    fn test_radius_follows_sprite_width() {
        let mut s = spawner(1);
        let atlas = SpriteAtlas::default();
        for _ in 0..50 {
            let o = s.spawn_obstacle();
            assert_eq!(o.radius(), atlas.rocks[o.sprite].x * OBSTACLE_RADIUS_FRACTION);
        }
    }

    #[test]
    fn test_drop_chance_extremes() {
        let mut s = spawner(3);
        assert!((0..100).all(|_| !s.roll_drop(0.0)));
        assert!((0..100).all(|_| s.roll_drop(1.0)));
    }

    #[test]
    fn test_power_up_kinds_both_appear() {
        let mut s = spawner(11);
        let kinds: Vec<_> = (0..64).map(|_| s.spawn_power_up(Vec2::new(50.0, 50.0)).kind).collect();
        assert!(kinds.contains(&PowerUpKind::Heal));
        assert!(kinds.contains(&PowerUpKind::MultiShot));
    }

    #[test]
    fn test_same_seed_same_rocks() {
        let mut a = spawner(99);
        let mut b = spawner(99);
        for _ in 0..10 {
            assert_eq!(a.spawn_obstacle().body.pos, b.spawn_obstacle().body.pos);
        }
    }
}
