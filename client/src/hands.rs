use crate::{
    input::InputAction,
    puzzle::{PuzzleSet, PuzzleWiring, puzzle_active},
};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use mudra_shared::{
    ContactShapeDef, ContactVolume, Finger, FingerContacts, HandReadings, sample_contacts,
};
use nalgebra as na;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<HandContacts>();
    app.add_systems(Update, pose_fingers.in_set(PuzzleSet::Input));
    app.add_systems(
        Update,
        (
            sample_hand_contacts.run_if(puzzle_active),
            clear_hand_contacts.run_if(not(puzzle_active)),
        )
            .in_set(PuzzleSet::Sense),
    );
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

/// Collider shape of a hand probe or finger tip, posed by the entity's `GlobalTransform`.
#[derive(Component, Clone, Debug, Deref)]
pub struct ContactShape(pub ContactShapeDef);

/// A finger tip collider. Its `Name` says which finger it is ("L_Index_Tip", ...).
#[derive(Component, Debug)]
pub struct FingerCollider;

/// Rest and curled local positions of a keyboard-driven finger tip.
#[derive(Component, Clone, Copy, Debug)]
pub struct FingerPose {
    pub finger: Finger,
    pub open: Vec3,
    pub curled: Vec3,
}

/// Latest contact sample of each wired hand.
#[derive(Resource, Default, Debug, Deref)]
pub struct HandContacts(pub HandReadings);

pub(crate) fn isometry_from(transform: &GlobalTransform) -> na::Isometry3<f32> {
    let (_, rotation, translation) = transform.to_scale_rotation_translation();
    na::Isometry3::from_parts(
        na::Translation3::new(translation.x, translation.y, translation.z),
        na::UnitQuaternion::from_quaternion(na::Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

fn pose_fingers(
    actions: Res<ActionState<InputAction>>,
    mut fingers: Query<(&FingerPose, &mut Transform)>,
) {
    for (pose, mut transform) in &mut fingers {
        let target = if actions.pressed(&InputAction::curl(pose.finger)) {
            pose.curled
        } else {
            pose.open
        };
        if transform.translation != target {
            transform.translation = target;
        }
    }
}

/// Re-samples both hands against every finger collider. Only runs while a puzzle is posed.
fn sample_hand_contacts(
    wiring: Res<PuzzleWiring>,
    probes: Query<(&GlobalTransform, &ContactShape), Without<FingerCollider>>,
    fingers: Query<(&Name, &GlobalTransform, &ContactShape), With<FingerCollider>>,
    mut contacts: ResMut<HandContacts>,
) {
    let volumes: Vec<(&str, ContactVolume)> = fingers
        .iter()
        .map(|(name, transform, shape)| {
            (name.as_str(), ContactVolume::new(shape, isometry_from(transform)))
        })
        .collect();

    let sample = |hand: Option<Entity>| -> Option<FingerContacts> {
        let (transform, shape) = probes.get(hand?).ok()?;
        let probe = ContactVolume::new(shape, isometry_from(transform));
        Some(sample_contacts(
            &probe,
            volumes.iter().map(|(name, volume)| (*name, volume)),
        ))
    };

    let readings = HandReadings::new(sample(wiring.left_hand), sample(wiring.right_hand));
    if readings != contacts.0 {
        debug!(
            "hand contacts left={:?} right={:?}",
            readings.left.map(|c| c.pattern()),
            readings.right.map(|c| c.pattern())
        );
    }
    contacts.0 = readings;
}

fn clear_hand_contacts(mut contacts: ResMut<HandContacts>) {
    if contacts.0 != HandReadings::default() {
        contacts.0 = HandReadings::default();
    }
}
