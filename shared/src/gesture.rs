use crate::contact::FingerContacts;
use rand::Rng;
use std::fmt;

/// Hand poses (mudras) a puzzle can ask for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Pathaka,
    Mushti,
    Ardhachandram,
}

impl Gesture {
    pub const ALL: [Gesture; 3] = [Gesture::Pathaka, Gesture::Mushti, Gesture::Ardhachandram];

    /// The exact contact pattern that identifies this pose.
    pub const fn contacts(self) -> FingerContacts {
        match self {
            // 00010
            Gesture::Pathaka => FingerContacts::from_bits(0b0_1000),
            // 11111
            Gesture::Mushti => FingerContacts::ALL,
            // 00111
            Gesture::Ardhachandram => FingerContacts::from_bits(0b1_1100),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Gesture::Pathaka => "Pathaka",
            Gesture::Mushti => "Mushti",
            Gesture::Ardhachandram => "Ardhachandram",
        }
    }

    /// Position in [`Gesture::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Uniform pick among all poses.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Gesture {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact-match lookup. Near misses are `None`, not the closest pose.
pub fn classify(contacts: FingerContacts) -> Option<Gesture> {
    Gesture::ALL
        .into_iter()
        .find(|gesture| gesture.contacts() == contacts)
}

/// [`classify`] over per-finger flags ordered thumb, index, middle, ring, pinky.
pub fn classify_flags(flags: [bool; 5]) -> Option<Gesture> {
    classify(FingerContacts::from_flags(flags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn every_pattern_classifies_exactly() {
        let mut matched = 0;
        for bits in 0u8..32 {
            let contacts = FingerContacts::from_bits(bits);
            let expected = match contacts.pattern().as_str() {
                "00010" => Some(Gesture::Pathaka),
                "11111" => Some(Gesture::Mushti),
                "00111" => Some(Gesture::Ardhachandram),
                _ => None,
            };
            let got = classify(contacts);
            assert_eq!(got, expected, "pattern {}", contacts.pattern());
            if got.is_some() {
                matched += 1;
            }
        }
        assert_eq!(matched, 3);
    }

    #[test]
    fn near_misses_do_not_match() {
        // Four of five fingers is not a fist.
        assert_eq!(classify_flags([true, true, true, true, false]), None);
        assert_eq!(classify_flags([false, true, true, true, true]), None);
        // Ring + pinky without middle is not a half moon.
        assert_eq!(classify_flags([false, false, false, true, true]), None);
        // Extra thumb contact spoils Pathaka.
        assert_eq!(classify_flags([true, false, false, true, false]), None);
        assert_eq!(classify_flags([false; 5]), None);
    }

    #[test]
    fn documented_patterns_match() {
        assert_eq!(
            classify_flags([false, false, false, true, false]),
            Some(Gesture::Pathaka)
        );
        assert_eq!(classify_flags([true; 5]), Some(Gesture::Mushti));
        assert_eq!(
            classify_flags([false, false, true, true, true]),
            Some(Gesture::Ardhachandram)
        );
    }

    #[test]
    fn random_pick_covers_every_pose() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[Gesture::random(&mut rng).index()] = true;
        }
        assert_eq!(seen, [true; 3]);
    }
}
