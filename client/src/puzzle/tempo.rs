use super::{PuzzleController, PuzzleWiring};
use crate::{settings::PuzzleSettings, song::SongAudio};
use bevy::{audio::Volume, prelude::*};
use mudra_shared::{Channel, TempoTweens};
use std::time::Duration;

/// Cadence of the tempo ramps. Without an interval they are sampled every frame.
#[derive(Resource, Debug)]
pub struct TempoClock {
    timer: Option<Timer>,
}

impl TempoClock {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            timer: interval.map(|i| Timer::new(i, TimerMode::Repeating)),
        }
    }

    fn ready(&mut self, delta: Duration) -> bool {
        match &mut self.timer {
            Some(timer) => timer.tick(delta).just_finished(),
            None => true,
        }
    }
}

impl FromWorld for TempoClock {
    fn from_world(world: &mut World) -> Self {
        Self::new(
            world
                .get_resource::<PuzzleSettings>()
                .and_then(|settings| settings.tick_interval),
        )
    }
}

pub(crate) fn apply_to_sink(sink: &mut AudioSink, channel: Channel, value: f32) {
    match channel {
        Channel::Volume => sink.set_volume(Volume::Linear(value)),
        Channel::Pitch => sink.set_speed(value),
        Channel::AnimSpeed => {}
    }
}

/// Pushes the current volume and pitch onto a sink that just started playing.
pub(crate) fn sync_sink(sink: &mut AudioSink, tempo: &TempoTweens) {
    for channel in [Channel::Volume, Channel::Pitch] {
        apply_to_sink(sink, channel, tempo.value(channel));
    }
}

pub(super) fn apply_tempo(
    time: Res<Time>,
    mut clock: ResMut<TempoClock>,
    mut controller: ResMut<PuzzleController>,
    wiring: Res<PuzzleWiring>,
    mut songs: Query<&mut AudioSink, With<SongAudio>>,
    mut players: Query<&mut AnimationPlayer>,
) {
    if !clock.ready(time.delta()) {
        return;
    }
    let updates = controller.puzzle.tick_tempo(time.elapsed());
    if updates.is_empty() {
        return;
    }

    for mut sink in &mut songs {
        for (channel, value) in updates.iter() {
            apply_to_sink(&mut sink, channel, value);
        }
    }

    let Some(speed) = updates.get(Channel::AnimSpeed) else {
        return;
    };
    let Some(mut player) = wiring.animation.and_then(|e| players.get_mut(e).ok()) else {
        return;
    };
    for (_, animation) in player.playing_animations_mut() {
        animation.set_speed(speed);
    }
}
