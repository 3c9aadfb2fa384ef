//! Asteroid Rush entry point
//!
//! Loads settings and assets, sets up the terminal and runs the game loop.

use std::fs::File;
use std::io::{BufWriter, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use asteroid_rush::{Settings, StartupError};
use asteroid_rush::assets::{FsAssetStore, SoundBank, SpriteAtlas};
use asteroid_rush::audio::SilentAudio;
use asteroid_rush::frontend::{Driver, TerminalGuard, TerminalInput, TerminalRenderer};
use asteroid_rush::platform::AudioPlayer;
use asteroid_rush::sim::Game;

#[derive(Parser, Debug)]
#[command(about = "Dodge and blast falling rocks in your terminal", version)]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Asset directory (img/ and sound/); built-in sprite sizes when omitted
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Gameplay RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Start with sound muted
    #[arg(long)]
    mute: bool,
    /// Write log output here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

#[cfg(feature = "audio")]
fn make_audio(bank: Option<SoundBank>, settings: &Settings) -> Box<dyn AudioPlayer> {
    use asteroid_rush::audio::{AudioManager, Volume};

    let Some(bank) = bank else {
        log::warn!("No asset directory, sound disabled");
        return Box::new(SilentAudio::new());
    };
    match AudioManager::new(&bank, Volume::new(&settings.audio)) {
        Ok(manager) => Box::new(manager),
        Err(err) => {
            log::warn!("{err}, sound disabled");
            Box::new(SilentAudio::new())
        }
    }
}

#[cfg(not(feature = "audio"))]
fn make_audio(_bank: Option<SoundBank>, _settings: &Settings) -> Box<dyn AudioPlayer> {
    Box::new(SilentAudio::new())
}

/// Everything loaded before the terminal is touched
struct Startup {
    settings: Settings,
    seed: u64,
    atlas: SpriteAtlas,
    bank: Option<SoundBank>,
}

fn load(args: &Args) -> Result<Startup, StartupError> {
    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if args.mute {
        settings.audio.muted = true;
    }
    let seed = settings.seed.unwrap_or_else(rand::random);

    let (atlas, bank) = match &args.assets {
        Some(dir) => {
            let store = FsAssetStore::new(dir);
            (SpriteAtlas::load(&store)?, Some(SoundBank::load(&store)?))
        }
        None => (SpriteAtlas::default(), None),
    };
    Ok(Startup {
        settings,
        seed,
        atlas,
        bank,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let Startup {
        settings,
        seed,
        atlas,
        bank,
    } = load(&args).context("startup failed")?;
    log::info!("Asteroid Rush starting (seed {seed})");
    let audio = make_audio(bank, &settings);

    let tuning = settings.tuning.clone();
    let game = Game::new(settings.tuning, atlas, seed);

    let guard = TerminalGuard::enter(stdout()).context("set up terminal")?;
    let renderer = TerminalRenderer::for_terminal(BufWriter::new(stdout()), tuning.screen_size())?;
    let input = TerminalInput::spawn(guard.keyboard_enhanced());

    let mut driver = Driver::new(game, input, renderer, audio, tuning.tick_ms());
    driver.set_muted(settings.audio.muted);
    let result = driver.run();
    // Restore the terminal before reporting anything
    drop(guard);

    let game = result.context("game loop")?;
    if let Some(score) = game.last_score() {
        println!("Last score: {score}");
    }
    Ok(())
}
