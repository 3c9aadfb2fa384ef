//! Sound effect ids and playback backends
//!
//! `SilentAudio` only logs. With the `audio` feature, `AudioManager` plays the
//! sound bank through rodio.

use crate::platform::AudioPlayer;
use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Projectile fired
    Shoot,
    /// Heal power-up collected
    Heal,
    /// Multi-shot power-up collected
    MultiShot,
    /// Ship lost its last health
    PlayerExploded,
    /// Rock destroyed
    ObstacleExploded,
}

/// Volume bookkeeping shared by the backends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    master: f32,
    sfx: f32,
    music: f32,
    muted: bool,
}

impl Volume {
    pub fn new(settings: &AudioSettings) -> Self {
        Self {
            master: settings.master_volume.clamp(0.0, 1.0),
            sfx: settings.sfx_volume.clamp(0.0, 1.0),
            music: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effects(&self) -> f32 {
        if self.muted { 0.0 } else { self.master * self.sfx }
    }

    pub fn music(&self) -> f32 {
        if self.muted { 0.0 } else { self.master * self.music }
    }
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct SilentAudio {
    played: usize,
    muted: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects played so far; requests while muted are not counted
    pub fn played(&self) -> usize {
        self.played
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl AudioPlayer for SilentAudio {
    fn play(&mut self, sound: SoundEffect) {
        if !self.muted {
            self.played += 1;
            log::trace!("sound {sound:?}");
        }
    }

    fn start_music(&mut self) {
        log::trace!("music start");
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(feature = "audio")]
pub use rodio_backend::AudioManager;

#[cfg(feature = "audio")]
mod rodio_backend {
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::BufReader;

    use rand::seq::IndexedRandom;
    use rodio::source::Buffered;
    use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

    use super::{SoundEffect, Volume};
    use crate::assets::{SoundBank, SoundHandle};
    use crate::error::PlatformError;
    use crate::platform::AudioPlayer;

    type Clip = Buffered<Decoder<BufReader<File>>>;

    fn decode(handle: &SoundHandle) -> Result<Clip, PlatformError> {
        let file = File::open(&handle.path)
            .map_err(|e| PlatformError::AudioUnavailable(format!("{}: {e}", handle.path.display())))?;
        let source = Decoder::try_from(file)
            .map_err(|e| PlatformError::AudioUnavailable(format!("{}: {e}", handle.path.display())))?;
        Ok(source.buffered())
    }

    /// Audio manager for the game
    pub struct AudioManager {
        stream: OutputStream,
        clips: HashMap<SoundEffect, Vec<Clip>>,
        music: SoundHandle,
        music_sink: Option<Sink>,
        volume: Volume,
    }

    impl AudioManager {
        /// Open the default output device and decode every clip up front
        pub fn new(bank: &SoundBank, volume: Volume) -> Result<Self, PlatformError> {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| PlatformError::AudioUnavailable(e.to_string()))?;
            stream.log_on_drop(false);

            let mut clips = HashMap::new();
            for effect in [
                SoundEffect::Shoot,
                SoundEffect::Heal,
                SoundEffect::MultiShot,
                SoundEffect::PlayerExploded,
                SoundEffect::ObstacleExploded,
            ] {
                let decoded = bank.variants(effect).iter().map(decode).collect::<Result<Vec<_>, _>>()?;
                clips.insert(effect, decoded);
            }

            Ok(Self {
                stream,
                clips,
                music: bank.music.clone(),
                music_sink: None,
                volume,
            })
        }
    }

    impl AudioPlayer for AudioManager {
        fn play(&mut self, sound: SoundEffect) {
            let vol = self.volume.effects();
            if vol <= 0.0 {
                return;
            }
            let Some(clip) = self.clips.get(&sound).and_then(|v| v.choose(&mut rand::rng())) else {
                return;
            };
            let sink = Sink::connect_new(self.stream.mixer());
            sink.set_volume(vol);
            sink.append(clip.clone());
            sink.detach();
        }

        fn start_music(&mut self) {
            let clip = match decode(&self.music) {
                Ok(clip) => clip,
                Err(err) => {
                    log::warn!("Background music disabled: {err}");
                    return;
                }
            };
            let sink = Sink::connect_new(self.stream.mixer());
            sink.set_volume(self.volume.music());
            sink.append(clip.repeat_infinite());
            self.music_sink = Some(sink);
        }

        fn set_muted(&mut self, muted: bool) {
            self.volume.set_muted(muted);
            if let Some(sink) = &self.music_sink {
                sink.set_volume(self.volume.music());
            }
        }
    }
}
