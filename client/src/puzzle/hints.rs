use super::{PuzzleStateChanged, PuzzleWiring};
use bevy::{ecs::system::SystemParam, prelude::*};
use mudra_shared::SceneTree;

/// Hint subtrees as seen through the ECS hierarchy.
#[derive(SystemParam)]
pub(super) struct HintTree<'w, 's> {
    children: Query<'w, 's, &'static Children>,
    visibility: Query<'w, 's, &'static mut Visibility>,
}

impl SceneTree for HintTree<'_, '_> {
    type Node = Entity;

    fn push_children(&self, node: Entity, out: &mut Vec<Entity>) {
        if let Ok(children) = self.children.get(node) {
            out.extend_from_slice(children);
        }
    }

    fn set_active(&mut self, node: Entity, active: bool) {
        if let Ok(mut visibility) = self.visibility.get_mut(node) {
            *visibility = if active {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}

pub(super) fn hide_all_hints(wiring: Res<PuzzleWiring>, mut tree: HintTree) {
    wiring.hints.hide_all(&mut tree);
}

pub(super) fn switch_hints(
    mut changes: MessageReader<PuzzleStateChanged>,
    wiring: Res<PuzzleWiring>,
    mut tree: HintTree,
) {
    for change in changes.read() {
        let shown = change.active().then(|| change.target());
        wiring.hints.show_only(&mut tree, shown);
    }
}
