//! Player ship controller
//!
//! Turns held keys into movement, fire requests into projectile spawn points,
//! and runs the two timed windows: invulnerability after losing a life and
//! the weapon upgrade decay.

use std::collections::HashSet;

use glam::Vec2;

use super::entity::{Body, HitShape};
use super::vitals::Vitals;
use crate::consts::*;
use crate::platform::Key;
use crate::settings::Tuning;

/// Where a volley of projectiles leaves the ship
#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    /// Horizontal centers, one per projectile
    pub xs: Vec<f32>,
    /// Ship top edge
    pub top: f32,
}

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub vitals: Vitals,
    /// Horizontal movement per tick
    pub speed: f32,
    invulnerable_since: Option<u64>,
    weapon_level: u32,
    last_upgrade_ms: u64,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1);
        let mut player = Self {
            body: Body::new(
                Vec2::ZERO,
                size,
                Vec2::ZERO,
                HitShape::Circle {
                    radius: PLAYER_RADIUS,
                },
            ),
            vitals: Vitals::new(tuning.player_max_health, tuning.player_lives),
            speed: tuning.player_speed,
            invulnerable_since: None,
            weapon_level: 1,
            last_upgrade_ms: 0,
        };
        player.reset_position(tuning.screen_size());
        player
    }

    /// Spawn anchor: horizontal center and bottom edge
    pub fn spawn_point(screen: Vec2) -> Vec2 {
        Vec2::new(screen.x / 2.0, screen.y - PLAYER_BOTTOM_MARGIN)
    }

    fn reset_position(&mut self, screen: Vec2) {
        let anchor = Self::spawn_point(screen);
        self.body.pos = Vec2::new(anchor.x - self.body.size.x / 2.0, anchor.y - self.body.size.y);
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_since.is_some()
    }

    pub fn weapon_level(&self) -> u32 {
        self.weapon_level
    }

    /// Per-tick update: timers first, then movement
    pub fn update(&mut self, held: &HashSet<Key>, now_ms: u64, tuning: &Tuning) {
        if self.weapon_level > 1
            && now_ms.saturating_sub(self.last_upgrade_ms) > tuning.weapon_decay_ms
        {
            self.weapon_level = 1;
        }

        if let Some(since) = self.invulnerable_since {
            if now_ms.saturating_sub(since) > tuning.invulnerability_ms {
                self.invulnerable_since = None;
                self.reset_position(tuning.screen_size());
                self.vitals.restore();
            } else {
                // Parked off-screen until the window closes
                return;
            }
        }

        if held.contains(&Key::Left) {
            self.body.pos.x -= self.speed;
        }
        if held.contains(&Key::Right) {
            self.body.pos.x += self.speed;
        }

        let screen_w = tuning.screen_width;
        if self.body.right() > screen_w {
            self.body.pos.x = screen_w - self.body.size.x;
        }
        if self.body.left() < 0.0 {
            self.body.pos.x = 0.0;
        }
    }

    /// Projectile spawn points for one trigger pull; `None` while invulnerable
    pub fn shoot(&self) -> Option<Volley> {
        if self.is_invulnerable() {
            return None;
        }

        let (left, center, right) = (self.body.left(), self.body.center().x, self.body.right());
        let xs = match self.weapon_level.min(WEAPON_MAX_SPREAD) {
            0 | 1 => vec![center],
            2 => vec![left, right],
            _ => vec![left, center, right],
        };
        Some(Volley {
            xs,
            top: self.body.top(),
        })
    }

    /// Start the invulnerability window and move the ship out of play
    pub fn enter_invulnerability(&mut self, now_ms: u64, screen: Vec2) {
        self.invulnerable_since = Some(now_ms);
        self.body.set_center(screen * 2.0);
    }

    /// Raise the weapon level (uncapped; three or more fires the full spread)
    pub fn upgrade_weapon(&mut self, now_ms: u64) {
        self.weapon_level = self.weapon_level.saturating_add(1);
        self.last_upgrade_ms = now_ms;
    }
}
