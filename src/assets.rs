//! Asset stores, sprite atlas and sound bank
//!
//! Assets are resolved once at startup. The sim only needs sprite sizes and
//! frame counts; the rodio backend needs sound file paths.

use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::audio::SoundEffect;
use crate::consts::*;
use crate::error::AssetError;
use crate::platform::AssetStore;

/// Image asset file names, relative to the asset root
pub mod paths {
    pub const BACKGROUND: &str = "img/background.png";
    pub const PLAYER: &str = "img/player.png";
    pub const PROJECTILE: &str = "img/bullet.png";
    pub const HEAL: &str = "img/shield.png";
    pub const MULTI_SHOT: &str = "img/gun.png";
    pub const ROCK_PATTERN: &str = "img/rock{}.png";
    pub const ROCK_VARIANTS: usize = 7;
    pub const EXPLOSION_PATTERN: &str = "img/expl{}.png";
    pub const PLAYER_EXPLOSION_PATTERN: &str = "img/player_expl{}.png";

    pub const MUSIC: &str = "sound/background.ogg";
    pub const SHOOT: &str = "sound/shoot.wav";
    pub const HEAL_SOUND: &str = "sound/pow0.wav";
    pub const MULTI_SHOT_SOUND: &str = "sound/pow1.wav";
    pub const PLAYER_EXPLODED: &str = "sound/rumble.ogg";
    pub const OBSTACLE_EXPLODED_PATTERN: &str = "sound/expl{}.wav";
    pub const OBSTACLE_EXPLODED_VARIANTS: usize = 2;
}

/// A loaded image: where it came from and its pixel size
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub path: PathBuf,
    pub size: Vec2,
}

/// A sound file that exists and can be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundHandle {
    pub path: PathBuf,
}

/// `pattern` with `{}` replaced by `index`
pub(crate) fn frame_path(pattern: &str, index: usize) -> String {
    pattern.replace("{}", &index.to_string())
}

/// Assets read from a directory on disk
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, AssetError> {
        let full = self.root.join(path);
        if full.is_file() {
            Ok(full)
        } else {
            Err(AssetError::Missing { path: full })
        }
    }
}

impl AssetStore for FsAssetStore {
    fn load_image(&self, path: &Path) -> Result<ImageHandle, AssetError> {
        let full = self.resolve(path)?;
        let (w, h) = image::image_dimensions(&full).map_err(|err| match err {
            image::ImageError::IoError(source) => AssetError::Io {
                path: full.clone(),
                source,
            },
            other => AssetError::Decode {
                path: full.clone(),
                reason: other.to_string(),
            },
        })?;
        log::debug!("Loaded image {} ({w}x{h})", full.display());
        Ok(ImageHandle {
            path: full,
            size: Vec2::new(w as f32, h as f32),
        })
    }

    fn load_sound(&self, path: &Path) -> Result<SoundHandle, AssetError> {
        let full = self.resolve(path)?;
        std::fs::File::open(&full).map_err(|source| AssetError::Io {
            path: full.clone(),
            source,
        })?;
        Ok(SoundHandle { path: full })
    }
}

/// Built-in sprite table used when no asset directory is given
///
/// Sizes match the stock art so gameplay is identical either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAssets;

impl BuiltinAssets {
    fn size_of(path: &Path) -> Option<Vec2> {
        let name = path.file_name()?.to_str()?;
        let size = match name {
            "background.png" => Vec2::new(500.0, 600.0),
            "player.png" => Vec2::new(99.0, 75.0),
            "bullet.png" => Vec2::new(9.0, 54.0),
            "shield.png" => Vec2::new(30.0, 30.0),
            "gun.png" => Vec2::new(19.0, 30.0),
            "rock0.png" => Vec2::new(101.0, 84.0),
            "rock1.png" => Vec2::new(120.0, 98.0),
            "rock2.png" => Vec2::new(89.0, 82.0),
            "rock3.png" => Vec2::new(98.0, 96.0),
            "rock4.png" => Vec2::new(43.0, 43.0),
            "rock5.png" => Vec2::new(28.0, 28.0),
            "rock6.png" => Vec2::new(18.0, 18.0),
            n if n.starts_with("player_expl") => Vec2::new(100.0, 100.0),
            n if n.starts_with("expl") => Vec2::new(75.0, 75.0),
            _ => return None,
        };
        Some(size)
    }
}

impl AssetStore for BuiltinAssets {
    fn load_image(&self, path: &Path) -> Result<ImageHandle, AssetError> {
        let size = Self::size_of(path).ok_or_else(|| AssetError::Missing {
            path: path.to_path_buf(),
        })?;
        Ok(ImageHandle {
            path: path.to_path_buf(),
            size,
        })
    }

    fn load_sound(&self, path: &Path) -> Result<SoundHandle, AssetError> {
        Ok(SoundHandle {
            path: path.to_path_buf(),
        })
    }
}

/// Sprite sizes and animation lengths the game needs
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAtlas {
    /// Ship, drawn scaled to the hit box
    pub player: Vec2,
    pub lives_icon: Vec2,
    pub projectile: Vec2,
    /// One entry per rock variant
    pub rocks: Vec<Vec2>,
    pub heal: Vec2,
    pub multi_shot: Vec2,
    pub explosion_frames: usize,
    pub player_explosion: Vec2,
    pub player_explosion_frames: usize,
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        // Infallible: every builtin path has an entry
        Self::load(&BuiltinAssets).unwrap_or_else(|_| Self::fallback())
    }
}

impl SpriteAtlas {
    fn fallback() -> Self {
        Self {
            player: Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            lives_icon: Vec2::new(LIVES_ICON_SIZE.0, LIVES_ICON_SIZE.1),
            projectile: Vec2::new(9.0, 54.0),
            rocks: vec![Vec2::new(43.0, 43.0)],
            heal: Vec2::new(30.0, 30.0),
            multi_shot: Vec2::new(19.0, 30.0),
            explosion_frames: EXPLOSION_FRAMES,
            player_explosion: Vec2::new(100.0, 100.0),
            player_explosion_frames: EXPLOSION_FRAMES,
        }
    }

    /// Load every sprite; any missing image is an error
    pub fn load(store: &dyn AssetStore) -> Result<Self, AssetError> {
        store.load_image(Path::new(paths::BACKGROUND))?;
        store.load_image(Path::new(paths::PLAYER))?;
        let projectile = store.load_image(Path::new(paths::PROJECTILE))?;
        let heal = store.load_image(Path::new(paths::HEAL))?;
        let multi_shot = store.load_image(Path::new(paths::MULTI_SHOT))?;
        let rocks = store.load_animation_frames(paths::ROCK_PATTERN, paths::ROCK_VARIANTS)?;
        let explosion = store.load_animation_frames(paths::EXPLOSION_PATTERN, EXPLOSION_FRAMES)?;
        let player_explosion = store.load_animation_frames(paths::PLAYER_EXPLOSION_PATTERN, EXPLOSION_FRAMES)?;

        Ok(Self {
            // The ship and its lives icon are always scaled
            player: Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            lives_icon: Vec2::new(LIVES_ICON_SIZE.0, LIVES_ICON_SIZE.1),
            projectile: projectile.size,
            rocks: rocks.iter().map(|r| r.size).collect(),
            heal: heal.size,
            multi_shot: multi_shot.size,
            explosion_frames: explosion.len(),
            player_explosion: player_explosion[0].size,
            player_explosion_frames: player_explosion.len(),
        })
    }
}

/// Sound files, one or more per effect
#[derive(Debug, Clone)]
pub struct SoundBank {
    pub music: SoundHandle,
    pub shoot: SoundHandle,
    pub heal: SoundHandle,
    pub multi_shot: SoundHandle,
    pub player_exploded: SoundHandle,
    /// Picked at random per rock explosion
    pub obstacle_exploded: Vec<SoundHandle>,
}

impl SoundBank {
    pub fn load(store: &dyn AssetStore) -> Result<Self, AssetError> {
        let obstacle_exploded = (0..paths::OBSTACLE_EXPLODED_VARIANTS)
            .map(|i| store.load_sound(Path::new(&frame_path(paths::OBSTACLE_EXPLODED_PATTERN, i))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            music: store.load_sound(Path::new(paths::MUSIC))?,
            shoot: store.load_sound(Path::new(paths::SHOOT))?,
            heal: store.load_sound(Path::new(paths::HEAL_SOUND))?,
            multi_shot: store.load_sound(Path::new(paths::MULTI_SHOT_SOUND))?,
            player_exploded: store.load_sound(Path::new(paths::PLAYER_EXPLODED))?,
            obstacle_exploded,
        })
    }

    /// Every file that can play for `effect`
    pub fn variants(&self, effect: SoundEffect) -> &[SoundHandle] {
        match effect {
            SoundEffect::Shoot => std::slice::from_ref(&self.shoot),
            SoundEffect::Heal => std::slice::from_ref(&self.heal),
            SoundEffect::MultiShot => std::slice::from_ref(&self.multi_shot),
            SoundEffect::PlayerExploded => std::slice::from_ref(&self.player_exploded),
            SoundEffect::ObstacleExploded => &self.obstacle_exploded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_atlas_has_all_rocks() {
        let atlas = SpriteAtlas::default();
        assert_eq!(atlas.rocks.len(), paths::ROCK_VARIANTS);
        assert_eq!(atlas.explosion_frames, 9);
        assert_eq!(atlas.player, Vec2::new(50.0, 38.0));
        assert_eq!(atlas.lives_icon, Vec2::new(25.0, 19.0));
    }

    #[test]
    fn test_builtin_rejects_unknown_image() {
        let err = BuiltinAssets.load_image(Path::new("img/unknown.png")).unwrap_err();
        assert!(matches!(err, AssetError::Missing { .. }));
    }

    #[test]
    fn test_empty_animation_is_an_error() {
        let err = BuiltinAssets.load_animation_frames(paths::EXPLOSION_PATTERN, 0).unwrap_err();
        assert!(matches!(err, AssetError::EmptyAnimation { .. }));
    }

    #[test]
    fn test_fs_store_reports_missing_file() {
        let store = FsAssetStore::new("/nonexistent-asset-root");
        let err = SpriteAtlas::load(&store).unwrap_err();
        assert!(matches!(err, AssetError::Missing { .. }));
        assert!(err.to_string().contains("background.png"));
    }

    #[test]
    fn test_sound_bank_variants() {
        let bank = SoundBank::load(&BuiltinAssets).unwrap();
        assert_eq!(bank.variants(SoundEffect::ObstacleExploded).len(), 2);
        assert_eq!(bank.variants(SoundEffect::Shoot)[0].path, PathBuf::from("sound/shoot.wav"));
    }
}
