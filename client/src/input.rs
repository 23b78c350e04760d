use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use mudra_shared::Finger;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Debug key: solve the current puzzle without hand tracking.
    ResolvePuzzle,
    // Keyboard stand-in for hand tracking: hold to curl a finger onto the palm.
    CurlThumb,
    CurlIndex,
    CurlMiddle,
    CurlRing,
    CurlPinky,
}

impl InputAction {
    pub const fn curl(finger: Finger) -> Self {
        match finger {
            Finger::Thumb => InputAction::CurlThumb,
            Finger::Index => InputAction::CurlIndex,
            Finger::Middle => InputAction::CurlMiddle,
            Finger::Ring => InputAction::CurlRing,
            Finger::Pinky => InputAction::CurlPinky,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::ResolvePuzzle, KeyCode::KeyE);
    input_map.insert(InputAction::CurlThumb, KeyCode::Digit1);
    input_map.insert(InputAction::CurlIndex, KeyCode::Digit2);
    input_map.insert(InputAction::CurlMiddle, KeyCode::Digit3);
    input_map.insert(InputAction::CurlRing, KeyCode::Digit4);
    input_map.insert(InputAction::CurlPinky, KeyCode::Digit5);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
}
