//! Startup configuration
//!
//! Loaded once from an optional JSON file before the loop starts. Every
//! field has a default, so a partial file only overrides what it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Health bar placement on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthBarLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for HealthBarLayout {
    fn default() -> Self {
        Self {
            x: 5.0,
            y: 10.0,
            width: 100.0,
            height: 10.0,
        }
    }
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Ticks per second
    pub tick_rate: u32,
    pub health_bar: HealthBarLayout,

    // === Player ===
    pub player_max_health: i32,
    pub player_lives: u32,
    /// Horizontal movement per tick
    pub player_speed: f32,
    pub invulnerability_ms: u64,
    pub weapon_decay_ms: u64,

    // === Spawning ===
    /// Rocks kept in play
    pub obstacle_count: usize,
    /// Probability that a rock destroyed by a projectile drops a power-up
    pub power_up_drop_chance: f64,
    pub heal_amount: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: 500.0,
            screen_height: 600.0,
            tick_rate: 60,
            health_bar: HealthBarLayout::default(),

            player_max_health: 100,
            player_lives: 3,
            player_speed: 8.0,
            invulnerability_ms: 1000,
            weapon_decay_ms: 5000,

            obstacle_count: 10,
            power_up_drop_chance: 0.05,
            heal_amount: 5,
        }
    }
}

impl Tuning {
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Length of one tick in milliseconds
    pub fn tick_ms(&self) -> u64 {
        1000 / u64::from(self.tick_rate.max(1))
    }
}

/// Volume levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.2,
            muted: false,
        }
    }
}

/// Everything read at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub audio: AudioSettings,
    /// Gameplay RNG seed; drawn from OS entropy when absent
    pub seed: Option<u64>,
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the game loop cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let t = &self.tuning;
        if !(t.screen_width > 0.0 && t.screen_height > 0.0) {
            return Err(SettingsError::Invalid("screen size must be positive"));
        }
        if t.tick_rate == 0 || t.tick_rate > 1000 {
            return Err(SettingsError::Invalid("tick_rate must be in 1..=1000"));
        }
        if t.player_max_health <= 0 {
            return Err(SettingsError::Invalid("player_max_health must be positive"));
        }
        if !(0.0..=1.0).contains(&t.power_up_drop_chance) {
            return Err(SettingsError::Invalid("power_up_drop_chance must be in [0, 1]"));
        }
        if t.heal_amount < 0 {
            return Err(SettingsError::Invalid("heal_amount must not be negative"));
        }
        let a = &self.audio;
        for vol in [a.master_volume, a.sfx_volume, a.music_volume] {
            if !(0.0..=1.0).contains(&vol) {
                return Err(SettingsError::Invalid("volumes must be in [0, 1]"));
            }
        }
        Ok(())
    }
}
