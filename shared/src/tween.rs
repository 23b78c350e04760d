/*!
Tempo ramps.

A ramp is a linear interpolation of one scalar (a [`Channel`]) from a start value to a
target value over a fixed duration. [`TempoTweens`] owns at most one ramp per channel:

- Starting a ramp on a busy channel drops the old one without completing it.
- Values are recomputed from elapsed time on every tick, so the tick cadence only
  controls how often results are pushed out, never the shape of the curve.
- When a ramp reaches its end the channel is pinned to exactly the target value and
  the ramp is removed; later ticks report nothing for that channel.

Time is a monotonic timestamp expressed as a [`Duration`] since an arbitrary origin
(e.g. the host's elapsed time).
*/

use crate::constants::NOMINAL_TEMPO;
use std::time::Duration;

/// A named scalar driven by the tempo effects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Song gain, `[0, 1]`.
    Volume,
    /// Song playback rate, `> 0`. Changing it shifts pitch.
    Pitch,
    /// Animation playback multiplier, `> 0`.
    AnimSpeed,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Volume, Channel::Pitch, Channel::AnimSpeed];

    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Channel::Volume => "volume",
            Channel::Pitch => "pitch",
            Channel::AnimSpeed => "animSpeed",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ramp {
    pub from: f32,
    pub to: f32,
    pub started_at: Duration,
    pub duration: Duration,
}

impl Ramp {
    /// Fraction of the ramp elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Duration) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Values produced by one [`TempoTweens::tick`], one optional entry per channel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TempoUpdates {
    values: [Option<f32>; 3],
}

impl TempoUpdates {
    pub fn get(&self, channel: Channel) -> Option<f32> {
        self.values[channel.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, f32)> + '_ {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| self.get(channel).map(|value| (channel, value)))
    }
}

#[derive(Clone, Debug)]
pub struct TempoTweens {
    ramps: [Option<Ramp>; 3],
    values: [f32; 3],
}

impl Default for TempoTweens {
    fn default() -> Self {
        Self::new(NOMINAL_TEMPO)
    }
}

impl TempoTweens {
    /// All channels idle at `initial`.
    pub fn new(initial: f32) -> Self {
        Self {
            ramps: [None; 3],
            values: [initial; 3],
        }
    }

    /// Last value written for `channel` by a start or a tick.
    pub fn value(&self, channel: Channel) -> f32 {
        self.values[channel.slot()]
    }

    pub fn ramp(&self, channel: Channel) -> Option<&Ramp> {
        self.ramps[channel.slot()].as_ref()
    }

    pub fn is_running(&self, channel: Channel) -> bool {
        self.ramps[channel.slot()].is_some()
    }

    /// The channel's value at `now`: the live ramp sample if one is running.
    pub fn sample(&self, channel: Channel, now: Duration) -> f32 {
        match &self.ramps[channel.slot()] {
            Some(ramp) => ramp.sample(now),
            None => self.values[channel.slot()],
        }
    }

    /// Replaces whatever ramp occupies `channel` with a new one.
    pub fn start(&mut self, channel: Channel, from: f32, to: f32, duration: Duration, now: Duration) {
        if let Some(old) = self.ramps[channel.slot()].take() {
            log::debug!(
                "tempo {}: superseding ramp {:.3} -> {:.3}",
                channel.name(),
                old.from,
                old.to
            );
        }
        self.values[channel.slot()] = from;
        self.ramps[channel.slot()] = Some(Ramp {
            from,
            to,
            started_at: now,
            duration,
        });
    }

    /// Ramps from wherever the channel currently is, avoiding an audible jump.
    pub fn ramp_to(&mut self, channel: Channel, to: f32, duration: Duration, now: Duration) {
        let from = self.sample(channel, now);
        self.start(channel, from, to, duration, now);
    }

    /// Drops the channel's ramp, leaving the value wherever the last tick left it.
    pub fn cancel(&mut self, channel: Channel) -> Option<Ramp> {
        self.ramps[channel.slot()].take()
    }

    /// Advances every running ramp to `now` and reports the new values.
    pub fn tick(&mut self, now: Duration) -> TempoUpdates {
        let mut updates = TempoUpdates::default();
        for channel in Channel::ALL {
            let slot = channel.slot();
            let Some(ramp) = self.ramps[slot] else {
                continue;
            };
            let value = ramp.sample(now);
            self.values[slot] = value;
            updates.values[slot] = Some(value);
            if ramp.is_finished(now) {
                self.ramps[slot] = None;
            }
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn linear_fade_is_pinned_at_completion() {
        let mut tweens = TempoTweens::default();
        tweens.start(Channel::Volume, 1.0, 0.0, ms(500), ms(0));

        assert_eq!(tweens.tick(ms(0)).get(Channel::Volume), Some(1.0));
        assert_eq!(tweens.tick(ms(250)).get(Channel::Volume), Some(0.5));
        assert_eq!(tweens.tick(ms(500)).get(Channel::Volume), Some(0.0));
        assert!(!tweens.is_running(Channel::Volume));

        // Finished ramps are gone; later ticks report nothing but the value stays pinned.
        assert_eq!(tweens.tick(ms(600)).get(Channel::Volume), None);
        assert_eq!(tweens.value(Channel::Volume), 0.0);
        assert_eq!(tweens.sample(Channel::Volume, ms(600)), 0.0);
    }

    #[test]
    fn late_tick_lands_exactly_on_target() {
        let mut tweens = TempoTweens::default();
        tweens.start(Channel::Pitch, 1.0, 0.75, ms(500), ms(100));

        // First tick arrives long after the ramp should have ended.
        let updates = tweens.tick(ms(2_000));
        assert_eq!(updates.get(Channel::Pitch), Some(0.75));
        assert_eq!(tweens.value(Channel::Pitch), 0.75);
    }

    #[test]
    fn superseding_starts_from_the_current_value() {
        let mut tweens = TempoTweens::default();
        tweens.start(Channel::Volume, 1.0, 0.0, ms(500), ms(0));
        tweens.tick(ms(250));

        tweens.ramp_to(Channel::Volume, 1.0, ms(500), ms(250));
        let ramp = tweens.ramp(Channel::Volume).copied().unwrap();
        assert_eq!(ramp.from, 0.5);
        assert_eq!(ramp.to, 1.0);

        assert_eq!(tweens.tick(ms(500)).get(Channel::Volume), Some(0.75));
        assert_eq!(tweens.tick(ms(750)).get(Channel::Volume), Some(1.0));
    }

    #[test]
    fn ramp_to_uses_elapsed_time_even_without_ticks() {
        let mut tweens = TempoTweens::default();
        tweens.start(Channel::AnimSpeed, 1.0, 0.2, ms(500), ms(0));

        // No tick happened in between; the live sample is still used as the start.
        tweens.ramp_to(Channel::AnimSpeed, 1.0, ms(500), ms(250));
        let from = tweens.ramp(Channel::AnimSpeed).unwrap().from;
        assert!((from - 0.6).abs() < 1.0e-6);
    }

    #[test]
    fn channels_run_independently() {
        let mut tweens = TempoTweens::default();
        tweens.start(Channel::Pitch, 1.0, 0.75, ms(500), ms(0));
        tweens.start(Channel::Volume, 1.0, 0.5, ms(500), ms(0));

        let updates = tweens.tick(ms(250));
        assert_eq!(updates.get(Channel::AnimSpeed), None);
        assert!((updates.get(Channel::Pitch).unwrap() - 0.875).abs() < 1.0e-6);
        assert!((updates.get(Channel::Volume).unwrap() - 0.75).abs() < 1.0e-6);

        tweens.cancel(Channel::Pitch);
        let updates = tweens.tick(ms(500));
        assert_eq!(updates.get(Channel::Pitch), None);
        assert_eq!(updates.get(Channel::Volume), Some(0.5));
        assert_eq!(updates.iter().count(), 1);
    }

    #[test]
    fn cancel_keeps_the_last_ticked_value() {
        let mut tweens = TempoTweens::default();
        tweens.start(Channel::Volume, 1.0, 0.0, ms(500), ms(0));
        tweens.tick(ms(250));

        assert!(tweens.cancel(Channel::Volume).is_some());
        assert_eq!(tweens.value(Channel::Volume), 0.5);
        assert!(tweens.tick(ms(500)).is_empty());
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut tweens = TempoTweens::default();
        tweens.start(Channel::Volume, 1.0, 0.3, Duration::ZERO, ms(10));
        assert_eq!(tweens.tick(ms(10)).get(Channel::Volume), Some(0.3));
        assert!(!tweens.is_running(Channel::Volume));
    }
}
