//! Fixed-rate driver loop and the terminal front end
//!
//! The driver owns the game and its collaborators. Each step polls input,
//! ticks the game, forwards sounds to the audio player and draws the frame.

pub mod input;
pub mod terminal;

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use crate::error::PlatformError;
use crate::platform::{AudioPlayer, InputEvent, InputSource, Key, Renderer};
use crate::renderer::build_frame;
use crate::sim::{Game, GameEvent, TickInput};

pub use input::TerminalInput;
pub use terminal::{TerminalGuard, TerminalRenderer};

/// Toggles sound in any phase
pub const MUTE_KEY: Key = Key::Char('m');

/// Runs the game against concrete input, renderer and audio
pub struct Driver<I, R, A> {
    game: Game,
    input: I,
    renderer: R,
    audio: A,
    muted: bool,
    tick: Duration,
}

impl<I: InputSource, R: Renderer, A: AudioPlayer> Driver<I, R, A> {
    pub fn new(game: Game, input: I, renderer: R, audio: A, tick_ms: u64) -> Self {
        Self {
            game,
            input,
            renderer,
            audio,
            muted: false,
            tick: Duration::from_millis(tick_ms.max(1)),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.audio.set_muted(muted);
    }

    /// One tick at `now_ms`; `Break` once the player quits
    pub fn step(&mut self, now_ms: u64) -> Result<ControlFlow<()>, PlatformError> {
        let events = self.input.poll_events();
        if events.contains(&InputEvent::KeyDown(MUTE_KEY)) {
            self.set_muted(!self.muted);
            log::info!("Sound {}", if self.muted { "muted" } else { "on" });
        }

        let input = TickInput::new(events, self.input.held_keys());
        if self.game.tick(&input, now_ms).is_break() {
            return Ok(ControlFlow::Break(()));
        }

        for event in self.game.drain_events() {
            match event {
                GameEvent::Sound(sound) => self.audio.play(sound),
                GameEvent::SessionOver { score } => log::info!("Final score: {score}"),
                GameEvent::SessionStarted | GameEvent::LifeLost { .. } | GameEvent::PowerUpCollected(_) => {}
            }
        }

        self.renderer.draw_frame(&build_frame(&self.game))?;
        Ok(ControlFlow::Continue(()))
    }

    /// Loop at the fixed tick rate until quit
    pub fn run(mut self) -> Result<Game, PlatformError> {
        let clock = Instant::now();
        self.audio.start_music();

        loop {
            let frame_start = Instant::now();
            let now_ms = clock.elapsed().as_millis() as u64;
            if self.step(now_ms)?.is_break() {
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.tick {
                std::thread::sleep(self.tick - elapsed);
            }
        }
        log::info!("Quit after {:.1}s", clock.elapsed().as_secs_f32());
        Ok(self.game)
    }
}
