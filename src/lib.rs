//! Asteroid Rush - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Game simulation (entities, collisions, state machine)
//! - `renderer`: Frame building and the terminal renderer
//! - `platform`: Renderer/audio/input/asset interfaces consumed by the core
//! - `assets`: Asset stores, sprite atlas and sound bank
//! - `audio`: Sound effect ids and playback backends
//! - `settings`: Startup configuration and tuning constants

pub mod assets;
pub mod audio;
pub mod error;
pub mod frontend;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::StartupError;
pub use settings::{Settings, Tuning};

use glam::Vec2;

/// Game constants that are not startup-configurable
pub mod consts {
    /// Projectile vertical speed (units per tick, negative is up)
    pub const PROJECTILE_SPEED: f32 = -10.0;
    /// Power-up fall speed (units per tick)
    pub const POWER_UP_SPEED: f32 = 3.0;

    /// Obstacle spawn ranges (half-open, integer steps)
    pub const OBSTACLE_SPAWN_Y: (i32, i32) = (-200, -80);
    pub const OBSTACLE_SPEED_X: (i32, i32) = (-3, 3);
    pub const OBSTACLE_SPEED_Y: (i32, i32) = (2, 10);
    pub const OBSTACLE_ROTATION_STEP: (i32, i32) = (-3, 3);
    /// Hit radius as a fraction of the rock sprite width
    pub const OBSTACLE_RADIUS_FRACTION: f32 = 0.4;

    /// Player ship sprite size and hit radius
    pub const PLAYER_SIZE: (f32, f32) = (50.0, 38.0);
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Gap between the ship's bottom edge and the screen bottom at spawn
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;

    /// Explosion animation timing
    pub const EXPLOSION_FRAME_MS: u64 = 50;
    pub const EXPLOSION_FRAMES: usize = 9;
    pub const EXPLOSION_LARGE_SIZE: f32 = 75.0;
    pub const EXPLOSION_SMALL_SIZE: f32 = 30.0;

    /// Weapon level that fires the full three-way spread
    pub const WEAPON_MAX_SPREAD: u32 = 3;

    /// Lives icon (scaled-down ship) size and spacing
    pub const LIVES_ICON_SIZE: (f32, f32) = (25.0, 19.0);
    pub const LIVES_ICON_SPACING: f32 = 30.0;
}

/// Rectangle overlap test on (top-left, size) pairs
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && b_pos.x < a_pos.x + a_size.x
        && a_pos.y < b_pos.y + b_size.y
        && b_pos.y < a_pos.y + a_size.y
}

/// Bounding box of a `size` box rotated by `degrees` around its center
#[inline]
pub fn rotated_extent(size: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(
        (size.x * cos).abs() + (size.y * sin).abs(),
        (size.x * sin).abs() + (size.y * cos).abs(),
    )
}
