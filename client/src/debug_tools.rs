//! Debug/performance tooling for native dev builds.
//!
//! Only compiled behind `dev_native` (see `main.rs`).

use crate::hands::{ContactShape, FingerCollider, HandContacts};
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;
use mudra_shared::{Finger, FingerContacts};

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, draw_contact_volumes);
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

const PROBE_COLOR: Color = Color::srgb(0.3, 0.6, 1.0);
const OPEN_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
const TOUCH_COLOR: Color = Color::srgb(0.2, 1.0, 0.3);

/// Outlines every probe and finger tip. Tips in the latest hand sample turn green; the
/// sample is cleared while no puzzle is posed.
fn draw_contact_volumes(
    mut gizmos: Gizmos,
    contacts: Res<HandContacts>,
    probes: Query<(&GlobalTransform, &ContactShape), Without<FingerCollider>>,
    fingers: Query<(&Name, &GlobalTransform, &ContactShape), With<FingerCollider>>,
) {
    for (transform, shape) in &probes {
        gizmos.sphere(
            Isometry3d::from_translation(transform.translation()),
            shape.bounding_radius(),
            PROBE_COLOR,
        );
    }

    let touching = |name: &str| -> bool {
        let hand = if name.starts_with('L') {
            contacts.left
        } else {
            contacts.right
        };
        let hand = hand.unwrap_or(FingerContacts::NONE);
        Finger::matching(name).any(|finger| hand.has(finger))
    };
    for (name, transform, shape) in &fingers {
        let color = if touching(name.as_str()) {
            TOUCH_COLOR
        } else {
            OPEN_COLOR
        };
        gizmos.sphere(
            Isometry3d::from_translation(transform.translation()),
            shape.bounding_radius(),
            color,
        );
    }
}
