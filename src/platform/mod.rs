//! Platform abstraction layer
//!
//! The game core only talks to the outside world through these traits:
//! - Input events and held keys
//! - Frame presentation
//! - Sound playback
//! - Asset loading (startup only)

use std::collections::HashSet;
use std::path::Path;

use crate::assets::{ImageHandle, SoundHandle, frame_path};
use crate::audio::SoundEffect;
use crate::error::{AssetError, PlatformError};
use crate::renderer::Frame;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Fire
    Space,
    /// Pause / resume
    Escape,
    Char(char),
    Other,
}

/// Discrete input event for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// Source of input for the tick loop
pub trait InputSource {
    /// Events received since the last poll, oldest first
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Keys currently held down
    fn held_keys(&self) -> HashSet<Key>;
}

/// Presents a finished frame; a failure ends the loop
pub trait Renderer {
    fn draw_frame(&mut self, frame: &Frame) -> Result<(), PlatformError>;
}

/// Fire-and-forget sound output
pub trait AudioPlayer {
    fn play(&mut self, sound: SoundEffect);

    /// Start the looping background track
    fn start_music(&mut self);

    fn set_muted(&mut self, muted: bool);
}

impl<T: AudioPlayer + ?Sized> AudioPlayer for Box<T> {
    fn play(&mut self, sound: SoundEffect) {
        (**self).play(sound);
    }

    fn start_music(&mut self) {
        (**self).start_music();
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted);
    }
}

/// Image and sound loading; failures are fatal at startup
pub trait AssetStore {
    fn load_image(&self, path: &Path) -> Result<ImageHandle, AssetError>;

    /// Numbered frames: `pattern` contains `{}` replaced by 0..count
    fn load_animation_frames(&self, pattern: &str, count: usize) -> Result<Vec<ImageHandle>, AssetError> {
        if count == 0 {
            return Err(AssetError::EmptyAnimation {
                pattern: pattern.to_string(),
            });
        }
        (0..count)
            .map(|i| self.load_image(Path::new(&frame_path(pattern, i))))
            .collect()
    }

    fn load_sound(&self, path: &Path) -> Result<SoundHandle, AssetError>;
}
