use bevy::prelude::*;
use mudra_shared::{
    ConfigError, PuzzleConfig, TempoMode,
    config::{parse_flag, parse_seconds, parse_tick_millis},
    constants::LEGACY_TEMPO_POLL,
};

/// Wiring-time puzzle options, resolved once at startup.
#[derive(Resource, Debug, Clone, Deref)]
pub struct PuzzleSettings(pub PuzzleConfig);

pub(super) fn plugin(app: &mut App) {
    let config = read_config_from_cli_env(std::env::args().skip(1), |key| {
        std::env::var(key).ok()
    });
    info!(
        "Puzzle every {:.1}s, tempo mode {:?}, audio {}",
        config.trigger_interval.as_secs_f32(),
        config.tempo_mode,
        if config.defer_audio {
            "deferred until intro"
        } else {
            "starts at load"
        }
    );
    app.insert_resource(PuzzleSettings(config));
}

/// Builds the puzzle config from CLI args, falling back to environment variables.
///
/// Supported:
///   --interval <secs> | --interval=<secs>   (MUDRA_INTERVAL)
///   --tick-ms <ms>    | --tick-ms=<ms>      (MUDRA_TICK_MS, 0 = every frame)
///   --legacy-tick                           (MUDRA_LEGACY_TICK, same as --tick-ms 50)
///   --song <path>     | --song=<path>       (MUDRA_SONG)
///   --mute                                  (MUDRA_MUTE)
///   --defer-audio                           (MUDRA_DEFER_AUDIO)
///
/// Malformed values are logged and ignored.
pub fn read_config_from_cli_env(
    args: impl IntoIterator<Item = String>,
    env: impl Fn(&str) -> Option<String>,
) -> PuzzleConfig {
    let mut config = PuzzleConfig::default();
    let mut interval = env("MUDRA_INTERVAL");
    let mut tick = env("MUDRA_TICK_MS");
    let mut song = env("MUDRA_SONG");
    let mut mute = env("MUDRA_MUTE").is_some_and(|v| parse_flag(&v));
    let mut defer = env("MUDRA_DEFER_AUDIO").is_some_and(|v| parse_flag(&v));
    let mut legacy_tick = env("MUDRA_LEGACY_TICK").is_some_and(|v| parse_flag(&v));

    let mut args = args.into_iter();
    let mut pending_key: Option<&'static str> = None;
    while let Some(arg) = args.next() {
        if let Some(key) = pending_key.take() {
            match key {
                "interval" => interval = Some(arg),
                "tick-ms" => tick = Some(arg),
                "song" => song = Some(arg),
                _ => {}
            }
        } else if arg == "--mute" {
            mute = true;
        } else if arg == "--defer-audio" {
            defer = true;
        } else if arg == "--legacy-tick" {
            legacy_tick = true;
        } else if arg == "--interval" {
            pending_key = Some("interval");
        } else if arg == "--tick-ms" {
            pending_key = Some("tick-ms");
        } else if arg == "--song" {
            pending_key = Some("song");
        } else if let Some(val) = arg.strip_prefix("--interval=") {
            interval = Some(val.to_string());
        } else if let Some(val) = arg.strip_prefix("--tick-ms=") {
            tick = Some(val.to_string());
        } else if let Some(val) = arg.strip_prefix("--song=") {
            song = Some(val.to_string());
        }
    }

    if let Some(value) = interval {
        apply(parse_seconds(&value), |d| config.trigger_interval = d);
    }
    if legacy_tick {
        config.tick_interval = Some(LEGACY_TEMPO_POLL);
    }
    // An explicit cadence overrides the legacy preset.
    if let Some(value) = tick {
        apply(parse_tick_millis(&value), |t| config.tick_interval = t);
    }
    if let Some(path) = song.filter(|p| !p.trim().is_empty()) {
        config.song_path = path;
    }
    if mute {
        config.tempo_mode = TempoMode::Mute;
    }
    config.defer_audio = defer;
    config
}

fn apply<T>(parsed: Result<T, ConfigError>, set: impl FnOnce(T)) {
    match parsed {
        Ok(value) => set(value),
        Err(err) => warn!("Ignoring puzzle setting: {err}"),
    }
}
