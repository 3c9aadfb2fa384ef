//! Game session state and core simulation types
//!
//! A `GameSession` owns every entity collection for one run; nothing here
//! lives at process scope.

use glam::Vec2;

use super::arena::{Arena, SlotId};
use super::entity::{EntityRef, Explosion, ExplosionKind, Obstacle, PowerUp, PowerUpKind, Projectile};
use super::player::Player;
use super::spawner::Spawner;
use super::vitals::Score;
use crate::assets::SpriteAtlas;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::settings::Tuning;

/// Top-level state of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for a key release
    Welcome,
    /// Active gameplay
    Playing,
    /// Frozen, waiting for the pause key
    Paused,
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundEffect),
    SessionStarted,
    LifeLost { lives_left: u32 },
    PowerUpCollected(PowerUpKind),
    SessionOver { score: u32 },
}

/// One run of the game: the player, every entity group and the score
#[derive(Debug, Clone)]
pub struct GameSession {
    pub tuning: Tuning,
    pub atlas: SpriteAtlas,
    pub score: Score,
    pub player: Player,
    pub obstacles: Arena<Obstacle>,
    pub projectiles: Arena<Projectile>,
    pub power_ups: Arena<PowerUp>,
    pub explosions: Arena<Explosion>,
    pub spawner: Spawner,
    /// Explosion spawned when the last life was lost
    pub(crate) death_explosion: Option<SlotId>,
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    /// Empty session; call `start` to populate it
    pub fn new(tuning: Tuning, atlas: SpriteAtlas, seed: u64) -> Self {
        let spawner = Spawner::new(seed, &atlas, tuning.screen_width);
        Self {
            player: Player::new(&tuning),
            tuning,
            atlas,
            score: Score::default(),
            obstacles: Arena::new(),
            projectiles: Arena::new(),
            power_ups: Arena::new(),
            explosions: Arena::new(),
            spawner,
            death_explosion: None,
            events: Vec::new(),
        }
    }

    /// Reset to a fresh run: zero score, new player, initial rocks
    pub fn start(&mut self) {
        self.score.reset();
        self.obstacles.clear();
        self.projectiles.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.death_explosion = None;
        self.player = Player::new(&self.tuning);

        for _ in 0..self.tuning.obstacle_count {
            self.spawn_obstacle();
        }
        self.events.push(GameEvent::SessionStarted);
    }

    pub fn spawn_obstacle(&mut self) -> SlotId {
        let obstacle = self.spawner.spawn_obstacle();
        self.obstacles.insert(obstacle)
    }

    pub fn spawn_explosion(&mut self, kind: ExplosionKind, center: Vec2, now_ms: u64) -> SlotId {
        let (size, frames) = match kind {
            ExplosionKind::Large => (Vec2::splat(EXPLOSION_LARGE_SIZE), self.atlas.explosion_frames),
            ExplosionKind::Small => (Vec2::splat(EXPLOSION_SMALL_SIZE), self.atlas.explosion_frames),
            ExplosionKind::PlayerDeath => (self.atlas.player_explosion, self.atlas.player_explosion_frames),
        };
        self.explosions.insert(Explosion::new(center, kind, size, frames, now_ms))
    }

    /// Fire the player's weapon; one sound per trigger pull
    pub fn shoot(&mut self) -> usize {
        let Some(volley) = self.player.shoot() else {
            return 0;
        };
        for &x in &volley.xs {
            self.projectiles.insert(Projectile::new(x, volley.top, self.atlas.projectile));
        }
        self.events.push(GameEvent::Sound(SoundEffect::Shoot));
        volley.xs.len()
    }

    /// True once the last-life explosion has played out
    pub fn death_animation_finished(&self) -> bool {
        match self.death_explosion {
            Some(id) => !self.explosions.is_alive(id),
            None => false,
        }
    }

    /// Everything that should be drawn, in draw order
    pub fn live_entities(&self) -> Vec<EntityRef<'_>> {
        let mut out = Vec::with_capacity(
            1 + self.obstacles.len() + self.projectiles.len() + self.power_ups.len() + self.explosions.len(),
        );
        if !self.player.is_invulnerable() {
            out.push(EntityRef::Player(&self.player));
        }
        out.extend(self.obstacles.iter().map(|(_, e)| EntityRef::Obstacle(e)));
        out.extend(self.projectiles.iter().map(|(_, e)| EntityRef::Projectile(e)));
        out.extend(self.power_ups.iter().map(|(_, e)| EntityRef::PowerUp(e)));
        out.extend(self.explosions.iter().map(|(_, e)| EntityRef::Explosion(e)));
        out
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recycle dead slots once the tick is done with them
    pub(crate) fn sweep(&mut self) {
        self.obstacles.sweep();
        self.projectiles.sweep();
        self.power_ups.sweep();
        self.explosions.sweep();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_populates_rocks() {
        let mut session = GameSession::new(Tuning::default(), SpriteAtlas::default(), 1);
        assert!(session.obstacles.is_empty());

        session.start();
        assert_eq!(session.obstacles.len(), 10);
        assert_eq!(session.score.value(), 0);
        assert_eq!(session.drain_events(), vec![GameEvent::SessionStarted]);
    }

    #[test]
    fn test_restart_clears_collections() {
        let mut session = GameSession::new(Tuning::default(), SpriteAtlas::default(), 1);
        session.start();
        session.shoot();
        session.score.add(50);
        session.spawn_explosion(ExplosionKind::Large, Vec2::ZERO, 0);

        session.start();
        assert_eq!(session.score.value(), 0);
        assert!(session.projectiles.is_empty());
        assert!(session.explosions.is_empty());
        assert_eq!(session.obstacles.len(), 10);
    }

    #[test]
    fn test_shoot_emits_one_sound() {
        let mut session = GameSession::new(Tuning::default(), SpriteAtlas::default(), 1);
        session.start();
        session.drain_events();
        session.player.upgrade_weapon(0);
        session.player.upgrade_weapon(0);

        assert_eq!(session.shoot(), 3);
        assert_eq!(session.projectiles.len(), 3);
        assert_eq!(session.drain_events(), vec![GameEvent::Sound(SoundEffect::Shoot)]);
    }

    #[test]
    fn test_invulnerable_player_not_drawn() {
        let mut session = GameSession::new(Tuning::default(), SpriteAtlas::default(), 1);
        session.start();
        let before = session.live_entities().len();
        session.player.enter_invulnerability(0, session.tuning.screen_size());
        assert_eq!(session.live_entities().len(), before - 1);
    }
}
