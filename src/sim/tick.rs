//! Fixed-rate simulation tick
//!
//! `Game` is the state machine: Welcome, Playing and Paused are phases of
//! one loop. A Playing tick runs, in order: input events, entity update,
//! projectile/rock hits, rock/ship hits, power-up pickup, end check, sweep.

use std::collections::HashSet;
use std::ops::ControlFlow;

use super::collision::{resolve_against, resolve_group};
use super::entity::{Advance, AdvanceCtx, EntityMut, ExplosionKind, PowerUpKind, advance};
use super::state::{GameEvent, GamePhase, GameSession};
use crate::assets::SpriteAtlas;
use crate::audio::SoundEffect;
use crate::platform::{InputEvent, Key};
use crate::settings::Tuning;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Discrete events since the previous tick, oldest first
    pub events: Vec<InputEvent>,
    /// Keys held at poll time
    pub held: HashSet<Key>,
}

impl TickInput {
    pub fn new(events: Vec<InputEvent>, held: HashSet<Key>) -> Self {
        Self { events, held }
    }
}

/// Game state machine
#[derive(Debug, Clone)]
pub struct Game {
    phase: GamePhase,
    session: GameSession,
    /// Final score of the previous session, shown on the title screen
    last_score: Option<u32>,
}

impl Game {
    pub fn new(tuning: Tuning, atlas: SpriteAtlas, seed: u64) -> Self {
        Self {
            phase: GamePhase::Welcome,
            session: GameSession::new(tuning, atlas, seed),
            last_score: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    /// Advance one tick; `Break` means the player asked to quit
    pub fn tick(&mut self, input: &TickInput, now_ms: u64) -> ControlFlow<()> {
        match self.phase {
            GamePhase::Welcome => self.tick_welcome(input),
            GamePhase::Paused => self.tick_paused(input),
            GamePhase::Playing => self.tick_playing(input, now_ms),
        }
    }

    fn tick_welcome(&mut self, input: &TickInput) -> ControlFlow<()> {
        for event in &input.events {
            match event {
                InputEvent::Quit => return ControlFlow::Break(()),
                InputEvent::KeyUp(_) => {
                    self.session.start();
                    self.phase = GamePhase::Playing;
                    log::info!("Session started");
                    return ControlFlow::Continue(());
                }
                InputEvent::KeyDown(_) => {}
            }
        }
        ControlFlow::Continue(())
    }

    fn tick_paused(&mut self, input: &TickInput) -> ControlFlow<()> {
        for event in &input.events {
            match event {
                InputEvent::Quit => return ControlFlow::Break(()),
                InputEvent::KeyDown(Key::Escape) => {
                    self.phase = GamePhase::Playing;
                    log::debug!("Resumed");
                    return ControlFlow::Continue(());
                }
                _ => {}
            }
        }
        ControlFlow::Continue(())
    }

    fn tick_playing(&mut self, input: &TickInput, now_ms: u64) -> ControlFlow<()> {
        // (a) discrete events
        for event in &input.events {
            match event {
                InputEvent::Quit => return ControlFlow::Break(()),
                InputEvent::KeyDown(Key::Space) => {
                    self.session.shoot();
                }
                InputEvent::KeyDown(Key::Escape) => {
                    self.phase = GamePhase::Paused;
                    log::debug!("Paused");
                    return ControlFlow::Continue(());
                }
                _ => {}
            }
        }

        let session = &mut self.session;
        session.update_entities(&input.held, now_ms);
        session.resolve_projectile_hits(now_ms);
        session.resolve_player_hits(now_ms);
        session.resolve_pickups(now_ms);

        let over = session.player.vitals.lives() == 0 && session.death_animation_finished();
        session.sweep();

        if over {
            let score = session.score.value();
            session.events.push(GameEvent::SessionOver { score });
            self.last_score = Some(score);
            self.phase = GamePhase::Welcome;
            log::info!("Session over, score {score}");
        }
        ControlFlow::Continue(())
    }
}

impl GameSession {
    /// (b) advance every live entity one tick
    pub(crate) fn update_entities(&mut self, held: &HashSet<Key>, now_ms: u64) {
        let ctx = AdvanceCtx {
            now_ms,
            held,
            tuning: &self.tuning,
        };

        advance(EntityMut::Player(&mut self.player), &ctx);
        for (_, rock) in self.obstacles.iter_mut() {
            if advance(EntityMut::Obstacle(rock), &ctx) == Advance::Recycle {
                self.spawner.recycle(rock);
            }
        }
        for (_, shot) in self.projectiles.iter_mut() {
            advance(EntityMut::Projectile(shot), &ctx);
        }
        for (_, pickup) in self.power_ups.iter_mut() {
            advance(EntityMut::PowerUp(pickup), &ctx);
        }
        for (_, explosion) in self.explosions.iter_mut() {
            advance(EntityMut::Explosion(explosion), &ctx);
        }
    }

    /// (c) projectiles against rocks
    pub(crate) fn resolve_projectile_hits(&mut self, now_ms: u64) {
        let hits = resolve_group(&mut self.projectiles, &mut self.obstacles, true, true);

        for hit in hits {
            let Some(rock) = self.obstacles.get(hit.b) else {
                continue;
            };
            let (center, radius) = (rock.body.center(), rock.radius());

            self.events.push(GameEvent::Sound(SoundEffect::ObstacleExploded));
            self.score.add(radius as u32);
            if self.spawner.roll_drop(self.tuning.power_up_drop_chance) {
                let power_up = self.spawner.spawn_power_up(center);
                self.power_ups.insert(power_up);
            }
            self.spawn_obstacle();
            self.spawn_explosion(ExplosionKind::Large, center, now_ms);
        }
    }

    /// (d) rocks against the ship
    pub(crate) fn resolve_player_hits(&mut self, now_ms: u64) {
        if self.player.is_invulnerable() {
            return;
        }
        let player_body = self.player.body;
        let matched = resolve_against(&player_body, &mut self.obstacles, true);

        for id in matched {
            let Some(rock) = self.obstacles.get(id) else {
                continue;
            };
            let (center, radius) = (rock.body.center(), rock.radius());

            self.events.push(GameEvent::Sound(SoundEffect::ObstacleExploded));
            self.spawn_obstacle();
            self.spawn_explosion(ExplosionKind::Large, center, now_ms);

            // Rocks after the fatal one still break, but the parked ship takes no damage
            if self.player.is_invulnerable() {
                continue;
            }
            self.spawn_explosion(ExplosionKind::Small, player_body.center(), now_ms);
            if self.player.vitals.damage(radius) {
                let lives_left = self.player.vitals.lose_life();
                let death = self.spawn_explosion(ExplosionKind::PlayerDeath, player_body.center(), now_ms);
                self.death_explosion = Some(death);
                self.events.push(GameEvent::Sound(SoundEffect::PlayerExploded));
                self.events.push(GameEvent::LifeLost { lives_left });
                self.player.enter_invulnerability(now_ms, self.tuning.screen_size());
                log::debug!("Life lost, {lives_left} left");
            }
        }
    }

    /// (e) power-ups against the ship
    pub(crate) fn resolve_pickups(&mut self, now_ms: u64) {
        let player_body = self.player.body;
        let matched = resolve_against(&player_body, &mut self.power_ups, true);

        for id in matched {
            let Some(kind) = self.power_ups.get(id).map(|p| p.kind) else {
                continue;
            };
            match kind {
                PowerUpKind::Heal => {
                    self.player.vitals.heal(self.tuning.heal_amount);
                    self.events.push(GameEvent::Sound(SoundEffect::Heal));
                }
                PowerUpKind::MultiShot => {
                    self.player.upgrade_weapon(now_ms);
                    self.events.push(GameEvent::Sound(SoundEffect::MultiShot));
                }
            }
            self.events.push(GameEvent::PowerUpCollected(kind));
            log::debug!("Collected {kind:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Obstacle, PowerUp};
    use glam::Vec2;

    fn quiet_tuning() -> Tuning {
        Tuning {
            obstacle_count: 0,
            power_up_drop_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn key_up() -> TickInput {
        TickInput::new(vec![InputEvent::KeyUp(Key::Char('x'))], HashSet::new())
    }

    fn press(key: Key) -> TickInput {
        TickInput::new(vec![InputEvent::KeyDown(key)], HashSet::new())
    }

    fn playing_game(tuning: Tuning) -> Game {
        let mut game = Game::new(tuning, SpriteAtlas::default(), 5);
        assert!(game.tick(&key_up(), 0).is_continue());
        assert_eq!(game.phase(), GamePhase::Playing);
        game.drain_events();
        game
    }

    #[test]
    fn test_welcome_waits_for_key_up() {
        let mut game = Game::new(Tuning::default(), SpriteAtlas::default(), 5);
        game.tick(&press(Key::Space), 0);
        assert_eq!(game.phase(), GamePhase::Welcome);

        game.tick(&key_up(), 0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.session().obstacles.len(), 10);
    }

    #[test]
    fn test_quit_breaks_in_every_phase() {
        let quit = TickInput::new(vec![InputEvent::Quit], HashSet::new());

        let mut game = Game::new(Tuning::default(), SpriteAtlas::default(), 5);
        assert!(game.tick(&quit, 0).is_break());

        let mut game = playing_game(quiet_tuning());
        assert!(game.tick(&quit, 0).is_break());

        let mut game = playing_game(quiet_tuning());
        game.tick(&press(Key::Escape), 0);
        assert_eq!(game.phase(), GamePhase::Paused);
        assert!(game.tick(&quit, 0).is_break());
    }

    #[test]
    fn test_pause_freezes_entities() {
        let mut game = playing_game(Tuning::default());
        game.tick(&press(Key::Escape), 16);
        let before: Vec<Vec2> = game.session().obstacles.iter().map(|(_, o)| o.body.pos).collect();

        // Other keys do not resume
        game.tick(&press(Key::Space), 32);
        game.tick(&TickInput::default(), 48);
        assert_eq!(game.phase(), GamePhase::Paused);
        let after: Vec<Vec2> = game.session().obstacles.iter().map(|(_, o)| o.body.pos).collect();
        assert_eq!(before, after);
        assert!(game.session().projectiles.is_empty());

        game.tick(&press(Key::Escape), 64);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_population_constant_under_fire() {
        let mut game = playing_game(Tuning::default());
        let mut now = 0;
        for i in 0..600 {
            now += 16;
            let input = if i % 5 == 0 { press(Key::Space) } else { TickInput::default() };
            game.tick(&input, now);
            if game.phase() != GamePhase::Playing {
                break;
            }
            assert_eq!(game.session().obstacles.len(), 10);
        }
    }

    #[test]
    fn test_projectile_kill_scores_radius() {
        let mut game = playing_game(quiet_tuning());
        let session = game.session_mut();
        // 50 wide → radius 20
        session.obstacles.insert(Obstacle::new(0, Vec2::splat(50.0), Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0));
        session.projectiles.insert(crate::sim::entity::Projectile::new(125.0, 140.0, Vec2::new(9.0, 54.0)));

        game.tick(&TickInput::default(), 16);
        let session = game.session();
        assert_eq!(session.score.value(), 20);
        assert_eq!(session.obstacles.len(), 1);
        assert!(session.projectiles.is_empty());
        assert_eq!(session.explosions.len(), 1);
        assert_eq!(game.drain_events(), vec![GameEvent::Sound(SoundEffect::ObstacleExploded)]);
    }

    #[test]
    fn test_pickup_applies_effect() {
        let mut game = playing_game(quiet_tuning());
        let center = game.session().player.body.center();
        let session = game.session_mut();
        session.player.vitals.damage(10.0);
        session.power_ups.insert(PowerUp::new(center - Vec2::new(0.0, 3.0), PowerUpKind::Heal, Vec2::splat(30.0)));

        game.tick(&TickInput::default(), 16);
        assert_eq!(game.session().player.vitals.health(), 95);
        assert!(game.session().power_ups.is_empty());
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Heal)));
        assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Heal)));
    }

    #[test]
    fn test_invulnerable_ship_ignores_rocks() {
        let mut game = playing_game(quiet_tuning());
        let screen = game.session().tuning.screen_size();
        let session = game.session_mut();
        session.player.enter_invulnerability(0, screen);
        let parked = session.player.body.center();
        session
            .obstacles
            .insert(Obstacle::new(0, Vec2::splat(50.0), parked - Vec2::splat(25.0), Vec2::ZERO, 0.0));

        game.tick(&TickInput::default(), 16);
        assert_eq!(game.session().player.vitals.health(), 100);
        assert_eq!(game.session().obstacles.len(), 1);
    }
}
