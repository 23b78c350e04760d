use std::time::Duration;

/// Idle time between the end of one puzzle (or startup) and the next puzzle.
pub const DEFAULT_PUZZLE_INTERVAL: Duration = Duration::from_secs(7);

/// Length of every tempo transition (entering and leaving a puzzle).
pub const TEMPO_TRANSITION: Duration = Duration::from_millis(500);

/// Legacy polling cadence for tempo ramps.
///
/// Ramps are computed from elapsed time, so polling only changes how often the
/// value is pushed to the audio sink and animation player, never the curve itself.
pub const LEGACY_TEMPO_POLL: Duration = Duration::from_millis(50);

/// Playback rate, volume and animation speed outside of a puzzle.
pub const NOMINAL_TEMPO: f32 = 1.0;

/// Song playback rate while a puzzle is active. Rate changes shift pitch.
pub const SLOWED_PITCH: f32 = 0.75;

/// Song volume while a puzzle is active (slowed mode).
pub const SLOWED_VOLUME: f32 = 0.5;

/// Song volume while a puzzle is active (mute mode).
pub const MUTED_VOLUME: f32 = 0.0;

/// Animation speed multiplier while a puzzle is active.
pub const SLOWED_ANIMATION_SPEED: f32 = 0.2;

/// Background song used when nothing else is configured.
pub const DEFAULT_SONG_PATH: &str = "audio/kananashort.ogg";

/// One-shot sound played when a puzzle is solved.
pub const DEFAULT_SUCCESS_SOUND_PATH: &str = "audio/success.ogg";

// Status line shown next to the hint pictures.
pub const STATUS_CLICK_TO_START: &str = "Enjoy the Music... (Click to Start)";
pub const STATUS_PLAYING: &str = "Enjoy the Music...";
pub const STATUS_AWAITING_INTERACTION: &str = "Click/Trigger to Start Music";
pub const STATUS_SOLVED: &str = "Good! Enjoy the Music...";
