use crate::{
    ambient::AmbientEmitter,
    hands::{ContactShape, FingerCollider, FingerPose, Hand},
    puzzle::{PuzzleController, PuzzleWiring},
};
use bevy::prelude::*;
use mudra_shared::{Channel, ContactShapeDef, Finger, Gesture, HintRoots};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
    app.add_systems(Update, start_elephant_animation);
}

const ELEPHANT_MODEL: &str = "models/elephant.glb";
const SNEEZE_CLIP: &str = "audio/sneeze.ogg";

const HAND_HEIGHT: f32 = 1.2;
const HAND_SPACING: f32 = 0.25;
const PALM_RADIUS: f32 = 0.04;
const FINGER_TIP_RADIUS: f32 = 0.012;
/// Curled tips sit this far along the open offset, well inside the palm probe.
const CURL_FACTOR: f32 = 0.3;

#[derive(Resource)]
struct ElephantAnimation {
    graph: Handle<AnimationGraph>,
    index: AnimationNodeIndex,
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    assets: Res<AssetServer>,
) {
    info!("World setup");

    commands.spawn((
        Name::new("Ground"),
        Transform::from_xyz(0., 0., 0.),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(50., 50.).build())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.3, 0.25),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    let (graph, index) = AnimationGraph::from_clip(
        assets.load(GltfAssetLabel::Animation(0).from_asset(ELEPHANT_MODEL)),
    );
    commands.insert_resource(ElephantAnimation {
        graph: graphs.add(graph),
        index,
    });
    commands.spawn((
        Name::new("Elephant"),
        SceneRoot(assets.load(GltfAssetLabel::Scene(0).from_asset(ELEPHANT_MODEL))),
        Transform::from_xyz(0.0, 0.0, -4.0),
        AmbientEmitter::new(assets.load(SNEEZE_CLIP), 5.0, 15.0),
    ));

    let palm_mesh = meshes.add(Sphere::new(PALM_RADIUS));
    let tip_mesh = meshes.add(Sphere::new(FINGER_TIP_RADIUS));
    let skin = materials.add(Color::srgb_u8(224, 172, 105));
    let mut add_hand = |hand: Hand| {
        spawn_hand(&mut commands, hand, palm_mesh.clone(), tip_mesh.clone(), skin.clone())
    };
    let left_hand = add_hand(Hand::Left);
    let right_hand = add_hand(Hand::Right);

    let (status_text, hints) = spawn_overlay(&mut commands);

    commands.insert_resource(PuzzleWiring {
        left_hand: Some(left_hand),
        right_hand: Some(right_hand),
        hints,
        animation: None,
        status_text: Some(status_text),
    });
}

/// Local offset of an open finger tip from the palm center, for the left hand.
fn open_tip_offset(finger: Finger) -> Vec3 {
    match finger {
        Finger::Thumb => Vec3::new(0.07, 0.02, 0.0),
        Finger::Index => Vec3::new(0.03, 0.1, 0.0),
        Finger::Middle => Vec3::new(0.0, 0.11, 0.0),
        Finger::Ring => Vec3::new(-0.03, 0.1, 0.0),
        Finger::Pinky => Vec3::new(-0.055, 0.085, 0.0),
    }
}

fn spawn_hand(
    commands: &mut Commands,
    hand: Hand,
    palm_mesh: Handle<Mesh>,
    tip_mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
) -> Entity {
    let (side, prefix) = match hand {
        Hand::Left => (-1.0, "L"),
        Hand::Right => (1.0, "R"),
    };
    let palm = commands
        .spawn((
            Name::new(format!("{prefix}_Palm")),
            hand,
            ContactShape(ContactShapeDef::Sphere {
                radius: PALM_RADIUS,
            }),
            Mesh3d(palm_mesh),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(side * HAND_SPACING, HAND_HEIGHT, 0.0),
        ))
        .id();

    for finger in Finger::ALL {
        // The right hand mirrors the left one.
        let open = open_tip_offset(finger) * Vec3::new(-side, 1.0, 1.0);
        commands.spawn((
            Name::new(format!("{prefix}_{finger:?}_Tip")),
            FingerCollider,
            FingerPose {
                finger,
                open,
                curled: open * CURL_FACTOR,
            },
            ContactShape(ContactShapeDef::Sphere {
                radius: FINGER_TIP_RADIUS,
            }),
            Mesh3d(tip_mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(open),
            ChildOf(palm),
        ));
    }
    palm
}

/// What the hint for `gesture` tells the player to do.
pub fn hint_instruction(gesture: Gesture) -> String {
    let touching: Vec<&str> = Finger::ALL
        .into_iter()
        .filter(|&finger| gesture.contacts().has(finger))
        .map(Finger::name_fragment)
        .collect();
    format!("Touch the palm with: {}", touching.join(", "))
}

fn spawn_overlay(commands: &mut Commands) -> (Entity, HintRoots<Entity>) {
    let overlay = commands
        .spawn((
            Name::new("Overlay"),
            Node {
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(16.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
        ))
        .id();

    let status = commands
        .spawn((
            Name::new("Status"),
            Text::new(String::new()),
            TextFont::from_font_size(28.0),
            ChildOf(overlay),
        ))
        .id();

    let mut hints = HintRoots::default();
    for gesture in Gesture::ALL {
        let root = commands
            .spawn((
                Name::new(format!("Hint {gesture}")),
                Node {
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
                Visibility::Hidden,
                ChildOf(overlay),
            ))
            .id();
        commands.spawn((
            Text::new(gesture.name()),
            TextFont::from_font_size(22.0),
            ChildOf(root),
        ));
        commands.spawn((
            Text::new(hint_instruction(gesture)),
            TextFont::from_font_size(16.0),
            ChildOf(root),
        ));
        hints.set(gesture, Some(root));
    }
    (status, hints)
}

/// Loops the elephant's first clip once its scene has spawned an `AnimationPlayer`, and
/// hands that player to the puzzle.
fn start_elephant_animation(
    mut commands: Commands,
    animation: Res<ElephantAnimation>,
    controller: Res<PuzzleController>,
    mut wiring: ResMut<PuzzleWiring>,
    mut players: Query<(Entity, &mut AnimationPlayer), Added<AnimationPlayer>>,
) {
    for (entity, mut player) in &mut players {
        commands
            .entity(entity)
            .insert(AnimationGraphHandle(animation.graph.clone()));
        player
            .play(animation.index)
            .repeat()
            .set_speed(controller.puzzle.tempo().value(Channel::AnimSpeed));
        if wiring.animation.is_none() {
            debug!("animation player wired: {entity}");
            wiring.animation = Some(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_name_the_touching_fingers() {
        assert_eq!(
            hint_instruction(Gesture::Pathaka),
            "Touch the palm with: ring"
        );
        assert_eq!(
            hint_instruction(Gesture::Ardhachandram),
            "Touch the palm with: middle, ring, pinky"
        );
    }

    #[test]
    fn open_fingers_clear_the_palm_and_curled_fingers_touch_it() {
        for finger in Finger::ALL {
            let open = open_tip_offset(finger);
            assert!(open.length() > PALM_RADIUS + FINGER_TIP_RADIUS, "{finger:?}");
            assert!(
                (open * CURL_FACTOR).length() < PALM_RADIUS + FINGER_TIP_RADIUS,
                "{finger:?}"
            );
        }
    }
}
