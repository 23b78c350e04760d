// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod ambient;
mod camera;
mod hands;
mod input;
mod puzzle;
mod settings;
mod song;
mod status;
mod world;

pub use puzzle::{PuzzleStateChanged, PuzzleWiring};
pub use song::PlayIntroSong;

use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Window {
                title: "Mudra".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }
            .into(),
            ..default()
        }));

        // Settings go first: the puzzle resources are built from them.
        app.add_plugins((
            settings::plugin,
            input::plugin,
            puzzle::plugin,
            hands::plugin,
            status::plugin,
            song::plugin,
            ambient::plugin,
            camera::plugin,
            world::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}
