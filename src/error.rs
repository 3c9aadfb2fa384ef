//! Startup error types
//!
//! Everything that can fail does so before the loop starts; the tick itself
//! has no recoverable errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A missing or unreadable image or sound
#[derive(Debug)]
pub enum AssetError {
    Missing { path: PathBuf },
    Io { path: PathBuf, source: io::Error },
    Decode { path: PathBuf, reason: String },
    /// An animation pattern produced no frames
    EmptyAnimation { pattern: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path } => write!(f, "asset not found: {}", path.display()),
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Decode { path, reason } => write!(f, "cannot decode {}: {reason}", path.display()),
            Self::EmptyAnimation { pattern } => write!(f, "animation {pattern} has no frames"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Settings file problems
#[derive(Debug)]
pub enum SettingsError {
    Read { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read settings {}: {source}", path.display()),
            Self::Parse(err) => write!(f, "malformed settings: {err}"),
            Self::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// The terminal could not provide raw input or a drawable screen
#[derive(Debug)]
pub enum PlatformError {
    InputUnavailable(io::Error),
    DisplayUnavailable(io::Error),
    /// Terminal smaller than the play field needs
    TerminalTooSmall { cols: u16, rows: u16, min_cols: u16, min_rows: u16 },
    AudioUnavailable(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputUnavailable(err) => write!(f, "input device unavailable: {err}"),
            Self::DisplayUnavailable(err) => write!(f, "display unavailable: {err}"),
            Self::TerminalTooSmall {
                cols,
                rows,
                min_cols,
                min_rows,
            } => write!(f, "terminal is {cols}x{rows}, need at least {min_cols}x{min_rows}"),
            Self::AudioUnavailable(reason) => write!(f, "audio output unavailable: {reason}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputUnavailable(err) | Self::DisplayUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

/// Any failure before the first tick
#[derive(Debug)]
pub enum StartupError {
    Asset(AssetError),
    Settings(SettingsError),
    Platform(PlatformError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(err) => err.fmt(f),
            Self::Settings(err) => err.fmt(f),
            Self::Platform(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Asset(err) => Some(err),
            Self::Settings(err) => Some(err),
            Self::Platform(err) => Some(err),
        }
    }
}

impl From<AssetError> for StartupError {
    fn from(err: AssetError) -> Self {
        Self::Asset(err)
    }
}

impl From<SettingsError> for StartupError {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

impl From<PlatformError> for StartupError {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err)
    }
}
