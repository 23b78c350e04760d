pub mod audio_gate;
pub mod config;
pub mod constants;
pub mod contact;
pub mod gesture;
pub mod overlap;
pub mod puzzle;
pub mod tween;
pub mod visibility;

pub use audio_gate::{AudioGate, GateOutcome, InteractionKind, PlaybackError, SongPlayback};
pub use config::{ConfigError, PuzzleConfig, TempoMode};
pub use contact::{Finger, FingerContacts};
pub use gesture::{Gesture, classify, classify_flags};
pub use overlap::{ContactShapeDef, ContactVolume, sample_contacts};
pub use puzzle::{HandReadings, Puzzle, PuzzlePhase, PuzzleTransition, Resolution};
pub use tween::{Channel, Ramp, TempoTweens, TempoUpdates};
pub use visibility::{HintRoots, SceneTree, set_subtree_active};
