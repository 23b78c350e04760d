use crate::puzzle::{PuzzleSet, PuzzleStateChanged, PuzzleWiring};
use bevy::prelude::*;
use mudra_shared::constants::{STATUS_CLICK_TO_START, STATUS_SOLVED};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<StatusText>();
    app.add_systems(
        Update,
        (
            show_puzzle_status.in_set(PuzzleSet::React),
            apply_status_text
                .after(PuzzleSet::React)
                .run_if(resource_changed::<StatusText>.or(resource_changed::<PuzzleWiring>)),
        ),
    );
}

/// The line shown in the status text node.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Deref)]
pub struct StatusText(pub String);

impl Default for StatusText {
    fn default() -> Self {
        Self(STATUS_CLICK_TO_START.to_string())
    }
}

impl StatusText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

pub fn puzzle_status(change: &PuzzleStateChanged) -> String {
    if change.active() {
        format!("Mudra: {}", change.target())
    } else {
        STATUS_SOLVED.to_string()
    }
}

fn show_puzzle_status(
    mut changes: MessageReader<PuzzleStateChanged>,
    mut status: ResMut<StatusText>,
) {
    if let Some(change) = changes.read().last() {
        status.set_if_neq(StatusText(puzzle_status(change)));
    }
}

fn apply_status_text(
    status: Res<StatusText>,
    wiring: Res<PuzzleWiring>,
    mut texts: Query<&mut Text>,
) {
    let Some(mut text) = wiring.status_text.and_then(|e| texts.get_mut(e).ok()) else {
        return;
    };
    text.0.clone_from(&status.0);
}
