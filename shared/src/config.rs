use crate::constants::{
    DEFAULT_PUZZLE_INTERVAL, DEFAULT_SONG_PATH, DEFAULT_SUCCESS_SOUND_PATH, TEMPO_TRANSITION,
};
use std::time::Duration;
use thiserror::Error;

/// How the music reacts while a puzzle is posed. The two modes never mix.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TempoMode {
    /// Pitch down, lower the volume and slow the animation.
    #[default]
    Slowed,
    /// Fade the song out completely.
    Mute,
}

/// Wiring-time options for the puzzle controller.
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleConfig {
    pub trigger_interval: Duration,
    pub transition: Duration,
    pub tempo_mode: TempoMode,
    /// Wait for an explicit "play intro song" signal before touching the audio.
    pub defer_audio: bool,
    pub song_path: String,
    pub success_sound_path: Option<String>,
    /// Cadence for pushing tempo values out; `None` means every frame.
    pub tick_interval: Option<Duration>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            trigger_interval: DEFAULT_PUZZLE_INTERVAL,
            transition: TEMPO_TRANSITION,
            tempo_mode: TempoMode::default(),
            defer_audio: false,
            song_path: DEFAULT_SONG_PATH.to_string(),
            success_sound_path: Some(DEFAULT_SUCCESS_SOUND_PATH.to_string()),
            tick_interval: None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{value}` is not a number of seconds")]
    InvalidSeconds { value: String },
    #[error("`{value}` is not a whole number of milliseconds")]
    InvalidMillis { value: String },
    #[error("interval must be positive and finite, got {0}")]
    OutOfRange(f64),
}

/// Parses a puzzle interval given in (possibly fractional) seconds.
pub fn parse_seconds(value: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSeconds {
            value: value.to_string(),
        })?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::OutOfRange(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::OutOfRange(secs))
}

/// Parses a tick cadence in milliseconds; `0` selects every-frame ticking.
pub fn parse_tick_millis(value: &str) -> Result<Option<Duration>, ConfigError> {
    let millis: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidMillis {
            value: value.to_string(),
        })?;
    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}

/// Truthy flag values accepted from the environment.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
