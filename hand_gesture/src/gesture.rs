//! The gesture vocabulary.

use std::fmt;

use crate::finger::FingerState;

/// One discrete hand gesture.
///
/// Finger-pattern gestures and geometric gestures share one enum so a raw
/// bit pattern can never alias a named gesture.  Patterns with no name land
/// in [`Gesture::Unrecognized`], which still debounces normally but is never
/// acted upon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// All four fingers folded.
    Fist,
    Pinky,
    Ring,
    /// Middle finger alone (also the depth-ambiguous two-finger case).
    Mid,
    /// Middle, ring and pinky raised.
    Last3,
    Index,
    /// Index and middle raised, unresolved.
    First2,
    /// All four fingers raised.
    Last4,
    /// Open hand; also the neutral result when no hand is present.
    #[default]
    Palm,
    /// Index and middle spread apart.
    VGest,
    /// Index and middle held together, flat.
    TwoFingerClosed,
    PinchMajor,
    PinchMinor,
    /// Index, middle and ring raised.
    ThreeFingerScroll,
    Unrecognized(FingerState),
}

impl Gesture {
    /// Read a finger pattern directly as a gesture (last rule of the
    /// classification table).
    pub fn from_finger_state(state: FingerState) -> Self {
        match state {
            FingerState::FIST   => Gesture::Fist,
            FingerState::PINKY  => Gesture::Pinky,
            FingerState::RING   => Gesture::Ring,
            FingerState::MID    => Gesture::Mid,
            FingerState::LAST3  => Gesture::Last3,
            FingerState::INDEX  => Gesture::Index,
            FingerState::FIRST2 => Gesture::First2,
            FingerState::FIRST3 => Gesture::ThreeFingerScroll,
            FingerState::LAST4  => Gesture::Last4,
            other               => Gesture::Unrecognized(other),
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, Gesture::Unrecognized(_))
    }

    pub fn name(self) -> &'static str {
        match self {
            Gesture::Fist              => "FIST",
            Gesture::Pinky             => "PINKY",
            Gesture::Ring              => "RING",
            Gesture::Mid               => "MID",
            Gesture::Last3             => "LAST3",
            Gesture::Index             => "INDEX",
            Gesture::First2            => "FIRST2",
            Gesture::Last4             => "LAST4",
            Gesture::Palm              => "PALM",
            Gesture::VGest             => "V_GEST",
            Gesture::TwoFingerClosed   => "TWO_FINGER_CLOSED",
            Gesture::PinchMajor        => "PINCH_MAJOR",
            Gesture::PinchMinor        => "PINCH_MINOR",
            Gesture::ThreeFingerScroll => "THREE_FINGER_SCROLL",
            Gesture::Unrecognized(_)   => "UNRECOGNIZED",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Unrecognized(bits) => write!(f, "UNRECOGNIZED({})", bits),
            other                       => f.write_str(other.name()),
        }
    }
}
