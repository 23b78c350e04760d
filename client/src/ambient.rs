//! Background one-shots (the elephant's sneeze) played at random intervals between
//! puzzles. Emitters go quiet while a puzzle is active.

use crate::puzzle::{PuzzleSet, PuzzleStateChanged};
use bevy::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(AmbientState::new(SmallRng::from_os_rng()));
    app.add_systems(
        Update,
        (
            observe_puzzle.in_set(PuzzleSet::React),
            play_ambient.after(PuzzleSet::React),
        ),
    );
}

#[derive(Component, Debug)]
pub struct AmbientEmitter {
    pub clip: Handle<AudioSource>,
    pub min_interval: f32,
    pub max_interval: f32,
    timer: Option<Timer>,
}

impl AmbientEmitter {
    pub fn new(clip: Handle<AudioSource>, min_interval: f32, max_interval: f32) -> Self {
        Self {
            clip,
            min_interval,
            max_interval,
            timer: None,
        }
    }
}

#[derive(Resource, Debug)]
pub struct AmbientState {
    suspended: bool,
    rng: SmallRng,
}

impl AmbientState {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            suspended: false,
            rng,
        }
    }

    pub fn suspended(&self) -> bool {
        self.suspended
    }
}

fn next_delay(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    let delay = if max > min {
        rng.random_range(min..max)
    } else {
        min
    };
    delay.max(0.0)
}

fn observe_puzzle(mut changes: MessageReader<PuzzleStateChanged>, mut state: ResMut<AmbientState>) {
    for change in changes.read() {
        state.suspended = change.active();
    }
}

fn play_ambient(
    time: Res<Time>,
    mut commands: Commands,
    mut state: ResMut<AmbientState>,
    mut emitters: Query<&mut AmbientEmitter>,
) {
    if state.suspended {
        return;
    }
    for mut emitter in &mut emitters {
        let (min, max) = (emitter.min_interval, emitter.max_interval);
        let timer = emitter.timer.get_or_insert_with(|| {
            Timer::from_seconds(next_delay(&mut state.rng, min, max), TimerMode::Once)
        });
        if !timer.tick(time.delta()).is_finished() {
            continue;
        }
        debug!("ambient one-shot");
        commands.spawn((
            AudioPlayer::new(emitter.clip.clone()),
            PlaybackSettings::DESPAWN,
        ));
        emitter.timer = None;
    }
}
