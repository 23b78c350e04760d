//! Finger contact bitmask.
//!
//! Each tracked finger owns one bit. A hand sample is the set of fingers whose collider
//! currently overlaps the hand probe, rebuilt from scratch every frame.
//!
//! # Bit layout
//! - bit 0: thumb
//! - bit 1: index
//! - bit 2: middle
//! - bit 3: ring
//! - bit 4: pinky
//!
//! The textual pattern (see [`FingerContacts::pattern`]) lists fingers in the same order,
//! left to right, so `"00010"` means "ring finger only".

use std::fmt;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    #[inline]
    pub const fn bit_index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self.bit_index()
    }

    /// Lowercase fragment looked for in collider owner names.
    pub const fn name_fragment(self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }

    /// Every finger whose fragment appears in `name`, case-insensitively.
    ///
    /// A single name can identify more than one finger (e.g. `"IndexMiddleBridge"`).
    pub fn matching(name: &str) -> impl Iterator<Item = Finger> {
        let lower = name.to_lowercase();
        Finger::ALL
            .into_iter()
            .filter(move |finger| lower.contains(finger.name_fragment()))
    }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FingerContacts {
    bits: u8,
}

impl FingerContacts {
    const VALID_MASK: u8 = 0b1_1111;

    pub const NONE: FingerContacts = FingerContacts { bits: 0 };
    pub const ALL: FingerContacts = FingerContacts {
        bits: Self::VALID_MASK,
    };

    /// Builds a sample from raw bits; bits above the pinky are dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bits: bits & Self::VALID_MASK,
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Builds a sample from per-finger flags ordered thumb, index, middle, ring, pinky.
    pub const fn from_flags(flags: [bool; 5]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < flags.len() {
            if flags[i] {
                bits |= 1 << i;
            }
            i += 1;
        }
        Self { bits }
    }

    pub fn to_flags(self) -> [bool; 5] {
        Finger::ALL.map(|finger| self.has(finger))
    }

    /// Collects contacts from the owner names of every collider overlapping a hand probe.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut contacts = Self::NONE;
        for name in names {
            for finger in Finger::matching(name) {
                contacts.add(finger);
            }
        }
        contacts
    }

    #[inline]
    pub fn add(&mut self, finger: Finger) {
        self.bits |= finger.mask();
    }

    #[inline]
    pub fn remove(&mut self, finger: Finger) {
        self.bits &= !finger.mask();
    }

    #[inline]
    pub fn has(self, finger: Finger) -> bool {
        self.bits & finger.mask() != 0
    }

    pub fn has_all(self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|&finger| self.has(finger))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Five-character `0`/`1` pattern, thumb first.
    pub fn pattern(self) -> String {
        Finger::ALL
            .iter()
            .map(|&finger| if self.has(finger) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for FingerContacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}

impl From<[bool; 5]> for FingerContacts {
    fn from(flags: [bool; 5]) -> Self {
        Self::from_flags(flags)
    }
}
