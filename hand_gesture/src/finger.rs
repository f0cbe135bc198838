//! Per-finger extension bits.

use std::fmt;

use crate::landmark::{index, LandmarkSet};

/// Segment lengths are floored here before dividing.
const MIN_SEGMENT: f32 = 0.01;

/// A finger counts as raised when its rounded tip/base ratio exceeds this.
const EXTENSION_RATIO: f32 = 0.5;

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The four non-thumb fingers, in bit order (index is the MSB).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// `(tip, pivot, base)` landmark indices used for the extension test.
    pub fn joints(self) -> (usize, usize, usize) {
        match self {
            Finger::Index  => (index::INDEX_TIP,  index::INDEX_MCP,  index::WRIST),
            Finger::Middle => (index::MIDDLE_TIP, index::MIDDLE_MCP, index::WRIST),
            Finger::Ring   => (index::RING_TIP,   index::RING_MCP,   index::WRIST),
            Finger::Pinky  => (index::PINKY_TIP,  index::PINKY_MCP,  index::WRIST),
        }
    }

    fn bit(self) -> u8 {
        match self {
            Finger::Index  => 0b1000,
            Finger::Middle => 0b0100,
            Finger::Ring   => 0b0010,
            Finger::Pinky  => 0b0001,
        }
    }

    /// Whether this finger is raised in `hand`.
    ///
    /// Compares the tip→pivot segment with the pivot→base segment.  Both
    /// are signed (negative when the first point sits lower on screen) and
    /// floored at [`MIN_SEGMENT`], so a folded finger collapses to the floor.
    pub fn is_extended_in(self, hand: &LandmarkSet) -> bool {
        let (tip, pivot, base) = self.joints();
        let d1 = hand.signed_distance(tip, pivot).max(MIN_SEGMENT);
        let d2 = hand.signed_distance(pivot, base).max(MIN_SEGMENT);
        round_tenths(d1 / d2) > EXTENSION_RATIO
    }
}

fn round_tenths(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

// ════════════════════════════════════════════════════════════════════════════
// FingerState
// ════════════════════════════════════════════════════════════════════════════

/// Four extension bits, index finger highest.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FingerState(u8);

impl FingerState {
    pub const FIST:   FingerState = FingerState(0b0000);
    pub const PINKY:  FingerState = FingerState(0b0001);
    pub const RING:   FingerState = FingerState(0b0010);
    pub const MID:    FingerState = FingerState(0b0100);
    pub const LAST3:  FingerState = FingerState(0b0111);
    pub const INDEX:  FingerState = FingerState(0b1000);
    pub const FIRST2: FingerState = FingerState(0b1100);
    pub const FIRST3: FingerState = FingerState(0b1110);
    pub const LAST4:  FingerState = FingerState(0b1111);

    /// Build from raw bits; anything above the low nibble is dropped.
    pub const fn from_bits(bits: u8) -> Self {
        FingerState(bits & 0b1111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Derive the bits from a hand, packing fingers MSB-first.
    pub fn from_landmarks(hand: &LandmarkSet) -> Self {
        Finger::ALL.iter().fold(FingerState::FIST, |state, &finger| {
            if finger.is_extended_in(hand) {
                FingerState(state.0 | finger.bit())
            } else {
                state
            }
        })
    }

    pub fn is_extended(self, finger: Finger) -> bool {
        self.0 & finger.bit() != 0
    }

    pub fn extended_count(self) -> u32 {
        self.0.count_ones()
    }
}

impl fmt::Debug for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FingerState({:04b})", self.0)
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04b}", self.0)
    }
}
