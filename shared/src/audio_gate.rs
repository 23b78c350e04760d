//! Background-song start-up under an autoplay policy.
//!
//! The host may refuse to start audio until the user has interacted with the page or
//! headset. [`AudioGate`] tries once, and on refusal "listens" for interaction events;
//! every qualifying interaction triggers another attempt until one succeeds. Only then
//! does it stop listening. There is no retry limit: whether the host will accept the
//! next attempt cannot be known in advance.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    /// The song has not been decoded/loaded yet, so there is nothing to start.
    #[error("song is not loaded yet")]
    SinkUnavailable,
    /// The host refused to start audio without a user gesture.
    #[error("playback blocked until the user interacts")]
    Blocked,
}

/// User interactions that may unlock audio playback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    PointerDown,
    TouchStart,
    KeyDown,
    Click,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::PointerDown,
        InteractionKind::TouchStart,
        InteractionKind::KeyDown,
        InteractionKind::Click,
    ];
}

/// Something that can be asked to start the looped background song.
pub trait SongPlayback {
    fn try_play(&mut self) -> Result<(), PlaybackError>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    /// Nothing attempted yet (e.g. waiting for an intro sequence to finish).
    #[default]
    Waiting,
    /// Last attempt was refused; waiting for the next interaction.
    Listening,
    /// The song is playing. Terminal.
    Playing,
}

/// Result of an attempt made through the gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// The song started just now.
    Started,
    /// The song was already playing; nothing was attempted.
    AlreadyPlaying,
    /// The attempt was refused; the gate is (still) listening.
    Retrying(PlaybackError),
}

#[derive(Debug, Default)]
pub struct AudioGate {
    state: GateState,
    listening_to: Vec<InteractionKind>,
    attempts: u32,
}

impl AudioGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == GateState::Listening
    }

    pub fn is_playing(&self) -> bool {
        self.state == GateState::Playing
    }

    /// Interaction kinds currently registered.
    pub fn listening_to(&self) -> &[InteractionKind] {
        &self.listening_to
    }

    /// Total number of play attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Tries to start playback now; on refusal starts listening for interactions.
    pub fn attempt<P: SongPlayback + ?Sized>(&mut self, player: &mut P) -> GateOutcome {
        if self.is_playing() {
            return GateOutcome::AlreadyPlaying;
        }
        self.attempts += 1;
        match player.try_play() {
            Ok(()) => {
                log::info!("song started after {} attempt(s)", self.attempts);
                self.state = GateState::Playing;
                self.listening_to.clear();
                GateOutcome::Started
            }
            Err(err) => {
                log::warn!("song playback refused ({err}); waiting for interaction");
                self.listen();
                GateOutcome::Retrying(err)
            }
        }
    }

    /// Feeds one user interaction. Returns `None` when the gate is not listening.
    pub fn on_interaction<P: SongPlayback + ?Sized>(
        &mut self,
        kind: InteractionKind,
        player: &mut P,
    ) -> Option<GateOutcome> {
        if !self.is_listening() || !self.listening_to.contains(&kind) {
            return None;
        }
        log::debug!("retrying song playback on {kind:?}");
        Some(self.attempt(player))
    }

    fn listen(&mut self) {
        self.state = GateState::Listening;
        if self.listening_to.is_empty() {
            self.listening_to.extend(InteractionKind::ALL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Refuses the first `refusals` attempts, then plays.
    struct ScriptedPlayer {
        refusals: u32,
        plays: u32,
    }

    impl ScriptedPlayer {
        fn refusing(refusals: u32) -> Self {
            Self { refusals, plays: 0 }
        }
    }

    impl SongPlayback for ScriptedPlayer {
        fn try_play(&mut self) -> Result<(), PlaybackError> {
            if self.refusals > 0 {
                self.refusals -= 1;
                return Err(PlaybackError::Blocked);
            }
            self.plays += 1;
            Ok(())
        }
    }

    #[test]
    fn immediate_success_never_listens() {
        let mut gate = AudioGate::new();
        let mut player = ScriptedPlayer::refusing(0);

        assert_eq!(gate.attempt(&mut player), GateOutcome::Started);
        assert!(gate.is_playing());
        assert!(gate.listening_to().is_empty());
        assert_eq!(
            gate.on_interaction(InteractionKind::Click, &mut player),
            None
        );
        assert_eq!(player.plays, 1);
    }

    #[test]
    fn refusal_registers_every_interaction_kind() {
        let mut gate = AudioGate::new();
        let mut player = ScriptedPlayer::refusing(1);

        assert_eq!(
            gate.attempt(&mut player),
            GateOutcome::Retrying(PlaybackError::Blocked)
        );
        assert!(gate.is_listening());
        assert_eq!(gate.listening_to(), &InteractionKind::ALL);
    }

    #[test]
    fn keeps_listening_until_an_attempt_succeeds() {
        let mut gate = AudioGate::new();
        let mut player = ScriptedPlayer::refusing(3);

        gate.attempt(&mut player);
        assert_eq!(
            gate.on_interaction(InteractionKind::KeyDown, &mut player),
            Some(GateOutcome::Retrying(PlaybackError::Blocked))
        );
        assert_eq!(
            gate.on_interaction(InteractionKind::TouchStart, &mut player),
            Some(GateOutcome::Retrying(PlaybackError::Blocked))
        );
        assert!(gate.is_listening());

        assert_eq!(
            gate.on_interaction(InteractionKind::PointerDown, &mut player),
            Some(GateOutcome::Started)
        );
        assert!(gate.listening_to().is_empty());
        assert_eq!(gate.attempts(), 4);

        // Deregistered: later interactions do nothing and playback starts only once.
        assert_eq!(
            gate.on_interaction(InteractionKind::Click, &mut player),
            None
        );
        assert_eq!(gate.attempt(&mut player), GateOutcome::AlreadyPlaying);
        assert_eq!(player.plays, 1);
    }

    #[test]
    fn waiting_gate_ignores_interactions() {
        let mut gate = AudioGate::new();
        let mut player = ScriptedPlayer::refusing(0);

        assert_eq!(gate.state(), GateState::Waiting);
        assert_eq!(
            gate.on_interaction(InteractionKind::Click, &mut player),
            None
        );
        assert_eq!(player.plays, 0);
    }
}
