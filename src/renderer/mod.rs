//! Frame building and rasterization
//!
//! `build_frame` turns the game into a `Frame`: a flat list of sprites, text
//! lines and the health bar in screen coordinates. Renderers only ever see
//! the `Frame`, never the session.

pub mod shapes;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{EntityRef, ExplosionKind, Game, GamePhase, PowerUpKind};

pub use shapes::{Canvas, Cell};

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Player,
    LivesIcon,
    Rock { variant: usize },
    Projectile,
    PowerUp(PowerUpKind),
    Explosion {
        kind: ExplosionKind,
        frame: usize,
        frame_count: usize,
    },
}

/// A positioned image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Rotation in degrees
    pub angle: f32,
}

/// Horizontally centered text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Font size in pixels
    pub size: u16,
    pub center_x: f32,
    pub top: f32,
}

/// Outlined bar with a proportional fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    pub pos: Vec2,
    pub size: Vec2,
    /// Fill fraction in [0, 1]
    pub fill: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub screen: Vec2,
    pub phase: GamePhase,
    /// Draw order: first to last
    pub sprites: Vec<Sprite>,
    pub texts: Vec<TextLine>,
    pub health_bar: Option<HealthBar>,
}

fn text(text: impl Into<String>, size: u16, center_x: f32, top: f32) -> TextLine {
    TextLine {
        text: text.into(),
        size,
        center_x,
        top,
    }
}

fn sprite_for(entity: EntityRef<'_>) -> Sprite {
    let body = *entity.body();
    let (kind, angle) = match entity {
        EntityRef::Player(_) => (SpriteKind::Player, 0.0),
        EntityRef::Obstacle(rock) => (SpriteKind::Rock { variant: rock.sprite }, rock.angle),
        EntityRef::Projectile(_) => (SpriteKind::Projectile, 0.0),
        EntityRef::PowerUp(p) => (SpriteKind::PowerUp(p.kind), 0.0),
        EntityRef::Explosion(e) => (
            SpriteKind::Explosion {
                kind: e.kind,
                frame: e.frame,
                frame_count: e.frame_count,
            },
            0.0,
        ),
    };
    Sprite {
        kind,
        pos: body.pos,
        size: body.size,
        angle,
    }
}

/// Snapshot the game for presentation
pub fn build_frame(game: &Game) -> Frame {
    let session = game.session();
    let tuning = &session.tuning;
    let screen = tuning.screen_size();
    let mut frame = Frame {
        screen,
        phase: game.phase(),
        sprites: Vec::new(),
        texts: Vec::new(),
        health_bar: None,
    };

    if game.phase() == GamePhase::Welcome {
        let cx = screen.x / 2.0;
        frame.texts.push(text("ASTEROID RUSH", 64, cx, screen.y / 5.0));
        frame
            .texts
            .push(text("Left/Right to move, Space to fire, Esc to pause", 22, cx, screen.y * 3.0 / 5.0));
        frame.texts.push(text("M to mute, Q to quit", 18, cx, screen.y * 3.0 / 5.0 + 30.0));
        frame.texts.push(text("Press any key to start", 18, cx, screen.y * 3.0 / 4.0));
        if let Some(score) = game.last_score() {
            frame
                .texts
                .push(text(format!("Last score: {score}"), 18, cx, screen.y * 3.0 / 4.0 + 30.0));
        }
        return frame;
    }

    frame.sprites.extend(session.live_entities().into_iter().map(sprite_for));

    frame.texts.push(text(session.score.value().to_string(), 18, screen.x / 2.0, 10.0));

    let layout = tuning.health_bar;
    frame.health_bar = Some(HealthBar {
        pos: Vec2::new(layout.x, layout.y),
        size: Vec2::new(layout.width, layout.height),
        fill: session.player.vitals.health_fraction().clamp(0.0, 1.0),
    });

    let icon = session.atlas.lives_icon;
    for i in 0..session.player.vitals.lives() {
        let x = screen.x - LIVES_ICON_SPACING - LIVES_ICON_SPACING * i as f32;
        frame.sprites.push(Sprite {
            kind: SpriteKind::LivesIcon,
            pos: Vec2::new(x, 10.0),
            size: icon,
            angle: 0.0,
        });
    }

    if game.phase() == GamePhase::Paused {
        frame.texts.push(text("PAUSED", 64, screen.x / 2.0, screen.y / 2.0 - 40.0));
        frame.texts.push(text("Esc to resume", 18, screen.x / 2.0, screen.y / 2.0 + 40.0));
    }
    frame
}
