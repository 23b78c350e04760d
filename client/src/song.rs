//! Looping background song and the success jingle.
//!
//! The song is spawned paused and started through an [`AudioGate`]: when the sink is not
//! ready (or the platform refuses), the gate listens for mouse, touch and key input and
//! retries on each one until playback starts.

use crate::{
    puzzle::{PuzzleController, PuzzleSet, PuzzleStateChanged, sync_sink},
    settings::PuzzleSettings,
    status::StatusText,
};
use bevy::prelude::*;
use mudra_shared::{
    AudioGate, GateOutcome, InteractionKind, PlaybackError, SongPlayback, TempoTweens,
    constants::{STATUS_AWAITING_INTERACTION, STATUS_PLAYING},
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<SongGate>();
    app.add_message::<PlayIntroSong>();

    app.add_systems(Startup, spawn_song);
    app.add_systems(PostStartup, start_song_at_load);
    app.add_systems(
        Update,
        (
            start_song_after_intro,
            (retry_song_when_loaded, retry_song_on_interaction).run_if(gate_listening),
            play_success_sound.in_set(PuzzleSet::React),
        ),
    );
}

#[derive(Component, Debug)]
pub struct SongAudio;

#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct SongGate(pub AudioGate);

/// Sent once an intro sequence is over. Starts the song when it was deferred.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct PlayIntroSong;

#[derive(Resource)]
struct SuccessSound(Handle<AudioSource>);

/// Song playback through the entity's `AudioSink`, which only exists once the asset loaded.
struct SinkPlayback<'a> {
    sink: Option<Mut<'a, AudioSink>>,
    tempo: &'a TempoTweens,
}

impl SongPlayback for SinkPlayback<'_> {
    fn try_play(&mut self) -> Result<(), PlaybackError> {
        let sink = self.sink.as_mut().ok_or(PlaybackError::SinkUnavailable)?;
        sync_sink(sink, self.tempo);
        sink.play();
        Ok(())
    }
}

fn spawn_song(mut commands: Commands, settings: Res<PuzzleSettings>, assets: Res<AssetServer>) {
    commands.spawn((
        Name::new("Song"),
        SongAudio,
        AudioPlayer::new(assets.load(settings.song_path.clone())),
        PlaybackSettings {
            paused: true,
            ..PlaybackSettings::LOOP
        },
    ));
    if let Some(path) = &settings.success_sound_path {
        commands.insert_resource(SuccessSound(assets.load(path.clone())));
    }
}

fn gate_listening(gate: Res<SongGate>) -> bool {
    gate.is_listening()
}

fn start_song_at_load(
    settings: Res<PuzzleSettings>,
    mut gate: ResMut<SongGate>,
    mut songs: Query<&mut AudioSink, With<SongAudio>>,
    controller: Res<PuzzleController>,
) {
    if settings.defer_audio {
        info!("song deferred until the intro finishes");
        return;
    }
    let mut player = SinkPlayback {
        sink: songs.single_mut().ok(),
        tempo: controller.puzzle.tempo(),
    };
    gate.attempt(&mut player);
}

fn start_song_after_intro(
    mut intro: MessageReader<PlayIntroSong>,
    mut gate: ResMut<SongGate>,
    mut songs: Query<&mut AudioSink, With<SongAudio>>,
    controller: Res<PuzzleController>,
    mut status: ResMut<StatusText>,
) {
    if intro.read().last().is_none() {
        return;
    }
    let mut player = SinkPlayback {
        sink: songs.single_mut().ok(),
        tempo: controller.puzzle.tempo(),
    };
    let text = match gate.attempt(&mut player) {
        GateOutcome::Started => STATUS_PLAYING,
        GateOutcome::Retrying(_) => STATUS_AWAITING_INTERACTION,
        GateOutcome::AlreadyPlaying => return,
    };
    status.set_if_neq(StatusText::new(text));
}

/// The asset finished decoding after a refused attempt: try once more right away.
fn retry_song_when_loaded(
    mut gate: ResMut<SongGate>,
    mut songs: Query<&mut AudioSink, (With<SongAudio>, Added<AudioSink>)>,
    controller: Res<PuzzleController>,
    mut status: ResMut<StatusText>,
) {
    let Ok(sink) = songs.single_mut() else {
        return;
    };
    let mut player = SinkPlayback {
        sink: Some(sink),
        tempo: controller.puzzle.tempo(),
    };
    if gate.attempt(&mut player) == GateOutcome::Started {
        status.set_if_neq(StatusText::new(STATUS_PLAYING));
    }
}

/// Maps this frame's raw input to the interaction kinds the gate listens for.
fn interactions(
    mouse: &ButtonInput<MouseButton>,
    touches: &Touches,
    keys: &ButtonInput<KeyCode>,
) -> Vec<InteractionKind> {
    let mut kinds = Vec::new();
    if mouse.get_just_pressed().next().is_some() {
        kinds.push(InteractionKind::PointerDown);
    }
    if touches.any_just_pressed() {
        kinds.push(InteractionKind::TouchStart);
    }
    if keys.get_just_pressed().next().is_some() {
        kinds.push(InteractionKind::KeyDown);
    }
    if mouse.just_released(MouseButton::Left) {
        kinds.push(InteractionKind::Click);
    }
    kinds
}

fn retry_song_on_interaction(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    keys: Res<ButtonInput<KeyCode>>,
    mut gate: ResMut<SongGate>,
    mut songs: Query<&mut AudioSink, With<SongAudio>>,
    controller: Res<PuzzleController>,
    mut status: ResMut<StatusText>,
) {
    let kinds = interactions(&mouse, &touches, &keys);
    if kinds.is_empty() {
        return;
    }
    let mut player = SinkPlayback {
        sink: songs.single_mut().ok(),
        tempo: controller.puzzle.tempo(),
    };
    for kind in kinds {
        if gate.on_interaction(kind, &mut player) == Some(GateOutcome::Started) {
            status.set_if_neq(StatusText::new(STATUS_PLAYING));
            break;
        }
    }
}

fn play_success_sound(
    mut commands: Commands,
    mut changes: MessageReader<PuzzleStateChanged>,
    sound: Option<Res<SuccessSound>>,
) {
    let Some(sound) = sound else {
        changes.clear();
        return;
    };
    for _ in changes.read().filter(|change| !change.active()) {
        commands.spawn((AudioPlayer::new(sound.0.clone()), PlaybackSettings::DESPAWN));
    }
}
