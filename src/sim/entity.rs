//! Entity types and the per-tick `advance` dispatch
//!
//! Every entity carries a `Body` (top-left position, size, velocity, hit shape,
//! alive flag). Behavior is selected by matching on `EntityMut`, a closed set
//! of variants, rather than by per-type update methods.

use std::collections::HashSet;

use glam::Vec2;

use super::player::Player;
use crate::consts::*;
use crate::platform::Key;
use crate::rotated_extent;
use crate::settings::Tuning;

/// Shape used for hit-testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    /// Axis-aligned bounding rectangle
    Rect,
    /// Circle around the body center
    Circle { radius: f32 },
}

/// Spatial state shared by all entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub shape: HitShape,
    pub alive: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, vel: Vec2, shape: HitShape) -> Self {
        Self {
            pos,
            size,
            vel,
            shape,
            alive: true,
        }
    }

    /// Body whose rectangle is centered on `center`
    pub fn centered(center: Vec2, size: Vec2, vel: Vec2, shape: HitShape) -> Self {
        Self::new(center - size / 2.0, size, vel, shape)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size / 2.0;
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Circle radius, if the body hit-tests as a circle
    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            HitShape::Circle { radius } => Some(radius),
            HitShape::Rect => None,
        }
    }
}

/// Anything stored in an arena and hit-tested
pub trait Collidable {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
}

/// Falling rock
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub body: Body,
    /// Rock sprite variant
    pub sprite: usize,
    /// Unrotated sprite size
    pub base_size: Vec2,
    /// Accumulated rotation (degrees, [0, 360))
    pub angle: f32,
    /// Rotation added per tick (degrees)
    pub rotation_step: f32,
}

impl Obstacle {
    pub fn new(sprite: usize, base_size: Vec2, pos: Vec2, vel: Vec2, rotation_step: f32) -> Self {
        let radius = base_size.x * OBSTACLE_RADIUS_FRACTION;
        Self {
            body: Body::new(pos, base_size, vel, HitShape::Circle { radius }),
            sprite,
            base_size,
            angle: 0.0,
            rotation_step,
        }
    }

    pub fn radius(&self) -> f32 {
        self.body.radius().unwrap_or(0.0)
    }

    /// Spin around a fixed center; the bounding box follows the rotated sprite
    fn rotate(&mut self) {
        let center = self.body.center();
        self.angle = (self.angle + self.rotation_step).rem_euclid(360.0);
        self.body.size = rotated_extent(self.base_size, self.angle);
        self.body.set_center(center);
    }

    /// Past the bottom, or fully off either side
    pub fn has_exited(&self, screen: Vec2) -> bool {
        self.body.top() > screen.y || self.body.left() > screen.x || self.body.right() < 0.0
    }
}

/// Player shot
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
}

impl Projectile {
    /// Projectile centered on `center_x` with its top edge at `top`
    pub fn new(center_x: f32, top: f32, size: Vec2) -> Self {
        let pos = Vec2::new(center_x - size.x / 2.0, top);
        Self {
            body: Body::new(pos, size, Vec2::new(0.0, PROJECTILE_SPEED), HitShape::Rect),
        }
    }
}

/// Power-up effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Heal,
    MultiShot,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Heal, PowerUpKind::MultiShot];
}

/// Collectible dropped by destroyed rocks
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(center: Vec2, kind: PowerUpKind, size: Vec2) -> Self {
        Self {
            body: Body::centered(center, size, Vec2::new(0.0, POWER_UP_SPEED), HitShape::Rect),
            kind,
        }
    }
}

/// Explosion animation variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplosionKind {
    /// Rock destroyed
    Large,
    /// Rock hit the ship
    Small,
    /// Ship destroyed
    PlayerDeath,
}

/// Frame-indexed animation that dies after its last frame
#[derive(Debug, Clone)]
pub struct Explosion {
    pub body: Body,
    pub kind: ExplosionKind,
    pub frame: usize,
    pub frame_count: usize,
    last_frame_ms: u64,
}

impl Explosion {
    pub fn new(center: Vec2, kind: ExplosionKind, size: Vec2, frame_count: usize, now_ms: u64) -> Self {
        Self {
            body: Body::centered(center, size, Vec2::ZERO, HitShape::Rect),
            kind,
            frame: 0,
            frame_count: frame_count.max(1),
            last_frame_ms: now_ms,
        }
    }
}

macro_rules! impl_collidable {
    ($($ty:ty),*) => {
        $(impl Collidable for $ty {
            fn body(&self) -> &Body {
                &self.body
            }
            fn body_mut(&mut self) -> &mut Body {
                &mut self.body
            }
        })*
    };
}

impl_collidable!(Obstacle, Projectile, PowerUp, Explosion, Player);

/// Mutable view over any entity
#[derive(Debug)]
pub enum EntityMut<'a> {
    Obstacle(&'a mut Obstacle),
    Projectile(&'a mut Projectile),
    PowerUp(&'a mut PowerUp),
    Player(&'a mut Player),
    Explosion(&'a mut Explosion),
}

/// Shared view over any entity
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Obstacle(&'a Obstacle),
    Projectile(&'a Projectile),
    PowerUp(&'a PowerUp),
    Player(&'a Player),
    Explosion(&'a Explosion),
}

impl EntityRef<'_> {
    pub fn body(&self) -> &Body {
        match self {
            EntityRef::Obstacle(e) => &e.body,
            EntityRef::Projectile(e) => &e.body,
            EntityRef::PowerUp(e) => &e.body,
            EntityRef::Player(e) => &e.body,
            EntityRef::Explosion(e) => &e.body,
        }
    }
}

/// Inputs to a single `advance` call
#[derive(Debug, Clone, Copy)]
pub struct AdvanceCtx<'a> {
    pub now_ms: u64,
    pub held: &'a HashSet<Key>,
    pub tuning: &'a Tuning,
}

impl AdvanceCtx<'_> {
    pub fn screen(&self) -> Vec2 {
        self.tuning.screen_size()
    }
}

/// What happened to an entity during `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still in play (or already dead)
    Moved,
    /// Obstacle left the screen and must be repositioned by the spawner
    Recycle,
}

/// Advance one entity by a tick
pub fn advance(entity: EntityMut<'_>, ctx: &AdvanceCtx<'_>) -> Advance {
    match entity {
        EntityMut::Obstacle(obstacle) => {
            if !obstacle.body.alive {
                return Advance::Moved;
            }
            obstacle.rotate();
            obstacle.body.pos += obstacle.body.vel;
            if obstacle.has_exited(ctx.screen()) {
                Advance::Recycle
            } else {
                Advance::Moved
            }
        }
        EntityMut::Projectile(projectile) => {
            let body = &mut projectile.body;
            if body.alive {
                body.pos += body.vel;
                if body.bottom() < 0.0 {
                    body.alive = false;
                }
            }
            Advance::Moved
        }
        EntityMut::PowerUp(power_up) => {
            let body = &mut power_up.body;
            if body.alive {
                body.pos += body.vel;
                if body.top() > ctx.screen().y {
                    body.alive = false;
                }
            }
            Advance::Moved
        }
        EntityMut::Player(player) => {
            player.update(ctx.held, ctx.now_ms, ctx.tuning);
            Advance::Moved
        }
        EntityMut::Explosion(explosion) => {
            if explosion.body.alive
                && ctx.now_ms.saturating_sub(explosion.last_frame_ms) > EXPLOSION_FRAME_MS
            {
                explosion.last_frame_ms = ctx.now_ms;
                explosion.frame += 1;
                if explosion.frame >= explosion.frame_count {
                    explosion.body.alive = false;
                }
            }
            Advance::Moved
        }
    }
}
