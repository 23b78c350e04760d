mod hints;
mod tempo;

use crate::{hands::HandContacts, input::InputAction, settings::PuzzleSettings};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use mudra_shared::{HintRoots, Puzzle, PuzzleConfig, PuzzleTransition};
use rand::{SeedableRng, rngs::SmallRng};

pub use tempo::TempoClock;
pub(crate) use tempo::sync_sink;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PuzzleController>();
    app.init_resource::<TempoClock>();
    app.init_resource::<PuzzleWiring>();
    app.add_message::<PuzzleStateChanged>();

    // Within a frame: read inputs, sample hands, run the state machine, then let every
    // observer react to this frame's transitions.
    app.configure_sets(
        Update,
        (
            PuzzleSet::Input,
            PuzzleSet::Sense,
            PuzzleSet::Evaluate,
            PuzzleSet::React,
        )
            .chain(),
    );

    app.add_systems(PostStartup, hints::hide_all_hints);
    app.add_systems(
        Update,
        (
            queue_manual_resolve.in_set(PuzzleSet::Input),
            advance_puzzle.in_set(PuzzleSet::Evaluate),
            hints::switch_hints.in_set(PuzzleSet::React),
            // Ramps run on their own cadence, after this frame's transitions started them.
            tempo::apply_tempo.after(PuzzleSet::Evaluate),
        ),
    );
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuzzleSet {
    Input,
    Sense,
    Evaluate,
    React,
}

/// Broadcast on every puzzle transition: `active()` is `true` when a puzzle starts and
/// `false` when it is resolved. Every reader sees every transition once, in order.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq, Deref)]
pub struct PuzzleStateChanged(pub PuzzleTransition);

impl PuzzleStateChanged {
    pub fn active(&self) -> bool {
        self.0.is_active()
    }
}

/// Scene references the puzzle drives. Anything left `None` is skipped.
#[derive(Resource, Default, Debug)]
pub struct PuzzleWiring {
    pub left_hand: Option<Entity>,
    pub right_hand: Option<Entity>,
    pub hints: HintRoots<Entity>,
    /// Entity carrying the `AnimationPlayer` slowed down during puzzles.
    pub animation: Option<Entity>,
    pub status_text: Option<Entity>,
}

#[derive(Resource)]
pub struct PuzzleController {
    pub puzzle: Puzzle,
    rng: SmallRng,
}

impl PuzzleController {
    pub fn new(config: &PuzzleConfig, rng: SmallRng) -> Self {
        Self {
            puzzle: Puzzle::new(config),
            rng,
        }
    }
}

impl FromWorld for PuzzleController {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<PuzzleSettings>()
            .map(|settings| settings.0.clone())
            .unwrap_or_default();
        Self::new(&config, SmallRng::from_os_rng())
    }
}

pub fn puzzle_active(controller: Res<PuzzleController>) -> bool {
    controller.puzzle.is_active()
}

fn queue_manual_resolve(
    actions: Res<ActionState<InputAction>>,
    mut controller: ResMut<PuzzleController>,
) {
    if actions.just_pressed(&InputAction::ResolvePuzzle) {
        debug!("manual puzzle resolve requested");
        controller.puzzle.request_manual_resolve();
    }
}

fn advance_puzzle(
    time: Res<Time>,
    hands: Res<HandContacts>,
    mut controller: ResMut<PuzzleController>,
    mut changes: MessageWriter<PuzzleStateChanged>,
) {
    let PuzzleController { puzzle, rng } = &mut *controller;
    for transition in puzzle.update(time.delta(), time.elapsed(), &hands.0, rng) {
        changes.write(PuzzleStateChanged(transition));
    }
}
