//! Puzzle lifecycle.
//!
//! The controller alternates between two phases:
//!
//! - **Idle**: the idle timer accumulates frame time. When it reaches the trigger interval
//!   a puzzle starts with a randomly chosen target pose.
//! - **Active**: every frame the manual trigger is checked first; otherwise both hands are
//!   classified and compared to the target. Either path resolves the puzzle and returns to
//!   Idle with the timer reset to zero.
//!
//! Entering and leaving a puzzle starts tempo ramps on the owned [`TempoTweens`]. Every
//! other side effect (hint pictures, status text, success sound, observers) belongs to the
//! host and is driven from the returned [`PuzzleTransition`]s.

use crate::{
    config::{PuzzleConfig, TempoMode},
    constants::{
        MUTED_VOLUME, NOMINAL_TEMPO, SLOWED_ANIMATION_SPEED, SLOWED_PITCH, SLOWED_VOLUME,
    },
    contact::FingerContacts,
    gesture::{Gesture, classify},
    tween::{Channel, TempoTweens, TempoUpdates},
};
use rand::Rng;
use std::time::Duration;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PuzzlePhase {
    #[default]
    Idle,
    Active {
        target: Gesture,
    },
}

/// The freshest contact sample of each hand. `None` when that hand is not wired.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HandReadings {
    pub left: Option<FingerContacts>,
    pub right: Option<FingerContacts>,
}

impl HandReadings {
    pub fn new(left: Option<FingerContacts>, right: Option<FingerContacts>) -> Self {
        Self { left, right }
    }

    pub fn both(contacts: FingerContacts) -> Self {
        Self::new(Some(contacts), Some(contacts))
    }

    /// Classified pose of each hand, `(left, right)`.
    pub fn gestures(&self) -> (Option<Gesture>, Option<Gesture>) {
        (
            self.left.and_then(classify),
            self.right.and_then(classify),
        )
    }

    /// Both hands form `target` in this very sample.
    pub fn both_match(&self, target: Gesture) -> bool {
        self.gestures() == (Some(target), Some(target))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Both hands formed the target pose.
    Matched,
    /// The manual test trigger fired.
    ManualTrigger,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PuzzleTransition {
    Started {
        target: Gesture,
    },
    Resolved {
        target: Gesture,
        resolution: Resolution,
    },
}

impl PuzzleTransition {
    /// The broadcast flag: `true` when a puzzle just started, `false` when one ended.
    pub fn is_active(&self) -> bool {
        matches!(self, PuzzleTransition::Started { .. })
    }

    pub fn target(&self) -> Gesture {
        match *self {
            PuzzleTransition::Started { target } | PuzzleTransition::Resolved { target, .. } => {
                target
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Puzzle {
    phase: PuzzlePhase,
    idle_elapsed: Duration,
    trigger_interval: Duration,
    transition: Duration,
    tempo_mode: TempoMode,
    manual_trigger: bool,
    tempo: TempoTweens,
    solved: u32,
}

impl Puzzle {
    pub fn new(config: &PuzzleConfig) -> Self {
        Self {
            phase: PuzzlePhase::Idle,
            idle_elapsed: Duration::ZERO,
            trigger_interval: config.trigger_interval,
            transition: config.transition,
            tempo_mode: config.tempo_mode,
            manual_trigger: false,
            tempo: TempoTweens::default(),
            solved: 0,
        }
    }

    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, PuzzlePhase::Active { .. })
    }

    pub fn target(&self) -> Option<Gesture> {
        match self.phase {
            PuzzlePhase::Active { target } => Some(target),
            PuzzlePhase::Idle => None,
        }
    }

    pub fn idle_elapsed(&self) -> Duration {
        self.idle_elapsed
    }

    pub fn trigger_interval(&self) -> Duration {
        self.trigger_interval
    }

    pub fn tempo_mode(&self) -> TempoMode {
        self.tempo_mode
    }

    pub fn tempo(&self) -> &TempoTweens {
        &self.tempo
    }

    /// Number of puzzles resolved so far.
    pub fn solved(&self) -> u32 {
        self.solved
    }

    /// Latches the manual test trigger. It is consumed by the next active frame.
    pub fn request_manual_resolve(&mut self) {
        self.manual_trigger = true;
    }

    pub fn manual_resolve_pending(&self) -> bool {
        self.manual_trigger
    }

    /// Runs one frame: idle timer, trigger check, then win detection.
    ///
    /// `dt` is the frame time, `now` the monotonic timestamp used by the tempo ramps.
    /// Returns the transitions of this frame in order. A puzzle can start and resolve in
    /// the same frame if the hands already hold the target pose.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        now: Duration,
        hands: &HandReadings,
        rng: &mut R,
    ) -> Vec<PuzzleTransition> {
        let mut transitions = Vec::new();

        if !self.is_active() {
            self.idle_elapsed += dt;
            if self.idle_elapsed >= self.trigger_interval {
                transitions.extend(self.begin(Gesture::random(rng), now));
            }
        }

        let PuzzlePhase::Active { target } = self.phase else {
            return transitions;
        };

        if self.manual_trigger {
            self.manual_trigger = false;
            transitions.extend(self.resolve(Resolution::ManualTrigger, now));
            return transitions;
        }

        if hands.both_match(target) {
            transitions.extend(self.resolve(Resolution::Matched, now));
        }
        transitions
    }

    /// Poses a puzzle with an explicit target. Does nothing while a puzzle is active.
    pub fn begin(&mut self, target: Gesture, now: Duration) -> Option<PuzzleTransition> {
        if self.is_active() {
            return None;
        }
        log::info!("puzzle started, target {target}");
        self.phase = PuzzlePhase::Active { target };

        let window = self.transition;
        match self.tempo_mode {
            TempoMode::Mute => {
                self.tempo.ramp_to(Channel::Volume, MUTED_VOLUME, window, now);
            }
            TempoMode::Slowed => {
                self.tempo.ramp_to(Channel::Pitch, SLOWED_PITCH, window, now);
                self.tempo.ramp_to(Channel::Volume, SLOWED_VOLUME, window, now);
                self.tempo
                    .ramp_to(Channel::AnimSpeed, SLOWED_ANIMATION_SPEED, window, now);
            }
        }

        Some(PuzzleTransition::Started { target })
    }

    /// Ends the active puzzle. Does nothing while idle.
    pub fn resolve(&mut self, resolution: Resolution, now: Duration) -> Option<PuzzleTransition> {
        let PuzzlePhase::Active { target } = self.phase else {
            return None;
        };
        log::info!("puzzle solved ({resolution:?}), target {target}");
        self.phase = PuzzlePhase::Idle;
        self.idle_elapsed = Duration::ZERO;
        self.solved += 1;

        let window = self.transition;
        match self.tempo_mode {
            TempoMode::Mute => {
                self.tempo.ramp_to(Channel::Volume, NOMINAL_TEMPO, window, now);
            }
            TempoMode::Slowed => {
                self.tempo.ramp_to(Channel::Pitch, NOMINAL_TEMPO, window, now);
                self.tempo.ramp_to(Channel::Volume, NOMINAL_TEMPO, window, now);
                self.tempo
                    .ramp_to(Channel::AnimSpeed, NOMINAL_TEMPO, window, now);
            }
        }

        Some(PuzzleTransition::Resolved { target, resolution })
    }

    /// Advances the tempo ramps; see [`TempoTweens::tick`].
    pub fn tick_tempo(&mut self, now: Duration) -> TempoUpdates {
        self.tempo.tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    const FRAME: Duration = Duration::from_millis(10);

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0xC0FFEE)
    }

    fn nothing() -> HandReadings {
        HandReadings::both(FingerContacts::NONE)
    }

    /// Drives the puzzle frame by frame until it becomes active.
    fn run_until_active(puzzle: &mut Puzzle, rng: &mut SmallRng, now: &mut Duration) -> Gesture {
        for _ in 0..10_000 {
            *now += FRAME;
            puzzle.update(FRAME, *now, &nothing(), rng);
            if let Some(target) = puzzle.target() {
                return target;
            }
        }
        panic!("puzzle never became active");
    }

    #[test]
    fn trigger_fires_on_the_frame_crossing_the_interval() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        let mut rng = rng();

        let t = puzzle.update(
            Duration::from_millis(6_990),
            Duration::from_millis(6_990),
            &nothing(),
            &mut rng,
        );
        assert!(t.is_empty());
        assert!(!puzzle.is_active());
        assert_eq!(puzzle.idle_elapsed(), Duration::from_millis(6_990));

        let t = puzzle.update(
            Duration::from_millis(10),
            Duration::from_secs(7),
            &nothing(),
            &mut rng,
        );
        assert_eq!(t.len(), 1);
        assert!(t[0].is_active());
        assert!(puzzle.is_active());
        assert_eq!(Some(t[0].target()), puzzle.target());
    }

    #[test]
    fn idle_timer_freezes_while_active_and_resets_on_resolve() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        let mut rng = rng();
        let mut now = Duration::ZERO;
        run_until_active(&mut puzzle, &mut rng, &mut now);

        let frozen = puzzle.idle_elapsed();
        for _ in 0..100 {
            now += FRAME;
            puzzle.update(FRAME, now, &nothing(), &mut rng);
        }
        assert!(puzzle.is_active());
        assert_eq!(puzzle.idle_elapsed(), frozen);

        puzzle.request_manual_resolve();
        now += FRAME;
        puzzle.update(FRAME, now, &nothing(), &mut rng);
        assert!(!puzzle.is_active());
        assert_eq!(puzzle.idle_elapsed(), Duration::ZERO);
    }

    #[test]
    fn one_hand_matching_is_not_enough() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        let mut rng = rng();
        let mut now = Duration::ZERO;
        let target = run_until_active(&mut puzzle, &mut rng, &mut now);

        let left_only = HandReadings::new(Some(target.contacts()), Some(FingerContacts::NONE));
        let right_only = HandReadings::new(Some(FingerContacts::NONE), Some(target.contacts()));
        let right_unwired = HandReadings::new(Some(target.contacts()), None);
        for hands in [left_only, right_only, right_unwired] {
            now += FRAME;
            assert!(puzzle.update(FRAME, now, &hands, &mut rng).is_empty());
            assert!(puzzle.is_active());
        }

        now += FRAME;
        let t = puzzle.update(FRAME, now, &HandReadings::both(target.contacts()), &mut rng);
        assert_eq!(
            t,
            vec![PuzzleTransition::Resolved {
                target,
                resolution: Resolution::Matched
            }]
        );
    }

    #[test]
    fn wrong_pose_does_not_resolve() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        let mut now = Duration::ZERO;
        puzzle.begin(Gesture::Pathaka, now);

        now += FRAME;
        let hands = HandReadings::both(Gesture::Mushti.contacts());
        assert!(puzzle.update(FRAME, now, &hands, &mut rng()).is_empty());
        assert_eq!(puzzle.target(), Some(Gesture::Pathaka));
    }

    #[test]
    fn manual_trigger_resolves_once_per_activation() {
        let mut puzzle = Puzzle::new(&PuzzleConfig {
            trigger_interval: Duration::from_millis(20),
            ..PuzzleConfig::default()
        });
        let mut rng = rng();
        let mut now = Duration::ZERO;
        run_until_active(&mut puzzle, &mut rng, &mut now);

        // One activation, observed over several frames (key held).
        puzzle.request_manual_resolve();
        let mut resolutions = 0;
        for _ in 0..5 {
            now += FRAME;
            resolutions += puzzle
                .update(FRAME, now, &nothing(), &mut rng)
                .iter()
                .filter(|t| !t.is_active())
                .count();
        }
        assert_eq!(resolutions, 1);
        assert!(!puzzle.manual_resolve_pending());
    }

    #[test]
    fn manual_trigger_short_circuits_gesture_check() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        let mut now = Duration::ZERO;
        puzzle.begin(Gesture::Mushti, now);
        puzzle.request_manual_resolve();

        now += FRAME;
        let t = puzzle.update(
            FRAME,
            now,
            &HandReadings::both(Gesture::Mushti.contacts()),
            &mut rng(),
        );
        assert_eq!(
            t,
            vec![PuzzleTransition::Resolved {
                target: Gesture::Mushti,
                resolution: Resolution::ManualTrigger
            }]
        );
    }

    #[test]
    fn slowed_mode_ramps_all_three_channels() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        puzzle.begin(Gesture::Ardhachandram, Duration::ZERO);

        let updates = puzzle.tick_tempo(Duration::from_millis(500));
        assert_eq!(updates.get(Channel::Pitch), Some(SLOWED_PITCH));
        assert_eq!(updates.get(Channel::Volume), Some(SLOWED_VOLUME));
        assert_eq!(updates.get(Channel::AnimSpeed), Some(SLOWED_ANIMATION_SPEED));
    }

    #[test]
    fn mute_mode_only_fades_volume() {
        let mut puzzle = Puzzle::new(&PuzzleConfig {
            tempo_mode: TempoMode::Mute,
            ..PuzzleConfig::default()
        });
        puzzle.begin(Gesture::Pathaka, Duration::ZERO);

        let half = puzzle.tick_tempo(Duration::from_millis(250));
        assert_eq!(half.get(Channel::Volume), Some(0.5));
        assert_eq!(half.get(Channel::Pitch), None);
        assert_eq!(half.get(Channel::AnimSpeed), None);

        puzzle.resolve(Resolution::ManualTrigger, Duration::from_millis(500));
        let restored = puzzle.tick_tempo(Duration::from_millis(1_000));
        assert_eq!(restored.get(Channel::Volume), Some(NOMINAL_TEMPO));
        assert_eq!(puzzle.tempo().value(Channel::Pitch), NOMINAL_TEMPO);
    }

    #[test]
    fn quick_resolve_restores_from_the_mid_ramp_value() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        puzzle.begin(Gesture::Pathaka, Duration::ZERO);
        puzzle.resolve(Resolution::Matched, Duration::from_millis(250));

        let ramp = puzzle.tempo().ramp(Channel::Pitch).copied().unwrap();
        assert!((ramp.from - 0.875).abs() < 1.0e-6);
        assert_eq!(ramp.to, NOMINAL_TEMPO);
    }

    #[test]
    fn mushti_end_to_end() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        let mut rng = rng();
        let mut now = Duration::from_secs(7);

        let started = puzzle.begin(Gesture::Mushti, now);
        assert_eq!(
            started,
            Some(PuzzleTransition::Started {
                target: Gesture::Mushti
            })
        );
        now += Duration::from_millis(600);
        puzzle.tick_tempo(now);
        assert_eq!(puzzle.tempo().value(Channel::Pitch), SLOWED_PITCH);

        let fist = FingerContacts::from_flags([true; 5]);
        assert_eq!(fist.pattern(), "11111");
        now += FRAME;
        let t = puzzle.update(FRAME, now, &HandReadings::both(fist), &mut rng);
        assert_eq!(
            t,
            vec![PuzzleTransition::Resolved {
                target: Gesture::Mushti,
                resolution: Resolution::Matched
            }]
        );
        assert!(!t[0].is_active());
        assert_eq!(puzzle.idle_elapsed(), Duration::ZERO);
        assert_eq!(puzzle.solved(), 1);

        now += Duration::from_millis(500);
        puzzle.tick_tempo(now);
        for channel in Channel::ALL {
            assert_eq!(puzzle.tempo().value(channel), NOMINAL_TEMPO);
        }
    }

    #[test]
    fn begin_and_resolve_are_idempotent_per_phase() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        assert_eq!(puzzle.resolve(Resolution::Matched, Duration::ZERO), None);

        assert!(puzzle.begin(Gesture::Mushti, Duration::ZERO).is_some());
        assert_eq!(puzzle.begin(Gesture::Pathaka, Duration::ZERO), None);
        assert_eq!(puzzle.target(), Some(Gesture::Mushti));
    }

    #[test]
    fn puzzle_can_start_and_resolve_in_one_frame() {
        let mut puzzle = Puzzle::new(&PuzzleConfig::default());
        let mut rng = rng();
        puzzle.request_manual_resolve();

        let t = puzzle.update(Duration::from_secs(7), Duration::from_secs(7), &nothing(), &mut rng);
        assert_eq!(t.len(), 2);
        assert!(t[0].is_active());
        assert!(!t[1].is_active());
        assert_eq!(t[0].target(), t[1].target());
    }
}
