//! Per-hand gesture classification.
//!
//! One [`GestureClassifier`] per hand role.  Instances never share state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::debounce::DebounceWindow;
use crate::finger::FingerState;
use crate::gesture::Gesture;
use crate::hand::HandRole;
use crate::landmark::{index, LandmarkSet};

/// Thumb tip to index tip, below which a pinch is recognised.
pub const PINCH_DISTANCE: f32 = 0.05;

/// Tip spread over MCP spread above which two raised fingers form a V.
pub const V_SPREAD_RATIO: f32 = 1.7;

/// Index/middle tip depth gap below which two fingers count as flat.
pub const FLAT_DEPTH_GAP: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// PinchAttribution
// ════════════════════════════════════════════════════════════════════════════

/// How a recognised pinch is labelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinchAttribution {
    /// Every hand reports `PinchMajor`.
    #[default]
    RoleAgnostic,
    /// The minor hand reports `PinchMinor`, the major hand `PinchMajor`.
    RoleSpecific,
}

// ════════════════════════════════════════════════════════════════════════════
// Instantaneous classification
// ════════════════════════════════════════════════════════════════════════════

/// Classify a single frame with no memory.  First matching rule wins:
///
/// 1. `LAST3`/`LAST4` with thumb and index tips touching → `PinchMajor`
/// 2. index, middle and ring up → `ThreeFingerScroll`
/// 3. index and middle up → `VGest`, `TwoFingerClosed` or `Mid`
/// 4. the finger pattern itself
pub fn classify_instantaneous(finger: FingerState, hand: &LandmarkSet) -> Gesture {
    if (finger == FingerState::LAST3 || finger == FingerState::LAST4)
        && hand.distance(index::INDEX_TIP, index::THUMB_TIP) < PINCH_DISTANCE
    {
        return Gesture::PinchMajor;
    }

    if finger == FingerState::FIRST3 {
        return Gesture::ThreeFingerScroll;
    }

    if finger == FingerState::FIRST2 {
        let tips = hand.distance(index::INDEX_TIP, index::MIDDLE_TIP);
        let mcps = hand.distance(index::INDEX_MCP, index::MIDDLE_MCP).max(f32::EPSILON);
        return if tips / mcps > V_SPREAD_RATIO {
            Gesture::VGest
        } else if hand.depth_gap(index::INDEX_TIP, index::MIDDLE_TIP) < FLAT_DEPTH_GAP {
            Gesture::TwoFingerClosed
        } else {
            Gesture::Mid
        };
    }

    Gesture::from_finger_state(finger)
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Stateful, debounced classifier for one hand role.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    role:        HandRole,
    attribution: PinchAttribution,
    finger:      FingerState,
    window:      DebounceWindow<Gesture>,
}

impl GestureClassifier {
    pub fn new(role: HandRole) -> Self {
        Self::with_attribution(role, PinchAttribution::default())
    }

    pub fn with_attribution(role: HandRole, attribution: PinchAttribution) -> Self {
        GestureClassifier {
            role,
            attribution,
            finger: FingerState::FIST,
            window: DebounceWindow::new(Gesture::Palm),
        }
    }

    pub fn role(&self) -> HandRole { self.role }

    /// Finger bits from the most recent hand that was present.
    pub fn finger_state(&self) -> FingerState { self.finger }

    /// Current debounced gesture.
    pub fn stable(&self) -> Gesture { self.window.stable() }

    /// Recompute the finger bits.  A missing hand leaves them untouched.
    pub fn set_finger_state(&mut self, hand: Option<&LandmarkSet>) -> FingerState {
        if let Some(hand) = hand {
            self.finger = FingerState::from_landmarks(hand);
        }
        self.finger
    }

    /// Classify this frame and run it through the debounce window.
    ///
    /// A missing hand yields `Palm` without touching the streak, so the
    /// next real frame continues where the last one left off.
    pub fn get_gesture(&mut self, hand: Option<&LandmarkSet>) -> Gesture {
        let Some(hand) = hand else {
            return Gesture::Palm;
        };

        let mut current = classify_instantaneous(self.finger, hand);
        if current == Gesture::PinchMajor
            && self.role == HandRole::Minor
            && self.attribution == PinchAttribution::RoleSpecific
        {
            current = Gesture::PinchMinor;
        }

        let before = self.window.stable();
        let after  = self.window.observe(current);
        if after != before {
            debug!(role = self.role.name(), from = %before, to = %after, "stable gesture changed");
        }
        after
    }

    /// Both per-frame steps in order.
    pub fn update(&mut self, hand: Option<&LandmarkSet>) -> Gesture {
        self.set_finger_state(hand);
        self.get_gesture(hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;
    use crate::pose::HandPose;

    fn instant(pose: HandPose) -> Gesture {
        let hand = pose.landmarks(0.5, 0.5);
        classify_instantaneous(FingerState::from_landmarks(&hand), &hand)
    }

    fn hold(c: &mut GestureClassifier, hand: &LandmarkSet, frames: usize) -> Gesture {
        let mut g = c.stable();
        for _ in 0..frames {
            g = c.update(Some(hand));
        }
        g
    }

    #[test]
    fn poses_classify_as_expected() {
        assert_eq!(instant(HandPose::Fist),              Gesture::Fist);
        assert_eq!(instant(HandPose::Open),              Gesture::Last4);
        assert_eq!(instant(HandPose::Index),             Gesture::Index);
        assert_eq!(instant(HandPose::Mid),               Gesture::Mid);
        assert_eq!(instant(HandPose::VGest),             Gesture::VGest);
        assert_eq!(instant(HandPose::TwoFingerClosed),   Gesture::TwoFingerClosed);
        assert_eq!(instant(HandPose::Pinch),             Gesture::PinchMajor);
        assert_eq!(instant(HandPose::ThreeFingerScroll), Gesture::ThreeFingerScroll);
    }

    #[test]
    fn two_fingers_at_different_depths_read_as_mid() {
        let mut pts = *HandPose::TwoFingerClosed.landmarks(0.5, 0.5).points();
        pts[index::INDEX_TIP].z = 0.15;
        let hand = LandmarkSet::new(pts);
        assert_eq!(classify_instantaneous(FingerState::FIRST2, &hand), Gesture::Mid);
    }

    #[test]
    fn pinch_with_all_four_up() {
        let mut pts = *HandPose::Open.landmarks(0.5, 0.5).points();
        let tip = pts[index::INDEX_TIP];
        pts[index::THUMB_TIP] = Landmark::new(tip.x + 0.02, tip.y, 0.0);
        let hand = LandmarkSet::new(pts);
        assert_eq!(classify_instantaneous(FingerState::LAST4, &hand), Gesture::PinchMajor);
    }

    #[test]
    fn pinch_pattern_without_contact_is_last3() {
        let hand = HandPose::Open.landmarks(0.5, 0.5);
        assert_eq!(classify_instantaneous(FingerState::LAST3, &hand), Gesture::Last3);
    }

    #[test]
    fn pinch_rule_takes_precedence() {
        // Touching tips with a forced FIRST2 pattern is not a pinch, but
        // LAST3 with the same geometry is.
        let hand = HandPose::Pinch.landmarks(0.5, 0.5);
        assert_eq!(classify_instantaneous(FingerState::LAST3, &hand), Gesture::PinchMajor);
        assert_ne!(classify_instantaneous(FingerState::FIRST2, &hand), Gesture::PinchMajor);
    }

    #[test]
    fn unnamed_pattern_is_unrecognized() {
        let hand = HandPose::Open.landmarks(0.5, 0.5);
        let g = classify_instantaneous(FingerState::from_bits(0b1010), &hand);
        assert_eq!(g, Gesture::Unrecognized(FingerState::from_bits(0b1010)));
    }

    #[test]
    fn pinch_becomes_stable_after_five_repeats() {
        let mut c = GestureClassifier::new(HandRole::Major);
        let hand = HandPose::Pinch.landmarks(0.5, 0.5);
        assert_eq!(hold(&mut c, &hand, 5), Gesture::Palm);
        assert_eq!(c.update(Some(&hand)), Gesture::PinchMajor);
    }

    #[test]
    fn missing_hand_is_palm_and_keeps_streak() {
        let mut c = GestureClassifier::new(HandRole::Major);
        let fist = HandPose::Fist.landmarks(0.5, 0.5);
        hold(&mut c, &fist, 3);
        assert_eq!(c.update(None), Gesture::Palm);
        assert_eq!(c.finger_state(), FingerState::FIST);
        // Streak resumes: three more fist frames complete the window.
        assert_eq!(hold(&mut c, &fist, 2), Gesture::Palm);
        assert_eq!(c.update(Some(&fist)), Gesture::Fist);
    }

    #[test]
    fn flicker_keeps_previous_stable_gesture() {
        let mut c = GestureClassifier::new(HandRole::Major);
        let fist = HandPose::Fist.landmarks(0.5, 0.5);
        let v    = HandPose::VGest.landmarks(0.5, 0.5);
        hold(&mut c, &fist, 6);
        for _ in 0..20 {
            hold(&mut c, &v, 2);
            assert_eq!(hold(&mut c, &fist, 2), Gesture::Fist);
        }
    }

    #[test]
    fn role_specific_minor_reports_pinch_minor() {
        let hand = HandPose::Pinch.landmarks(0.5, 0.5);
        let mut minor = GestureClassifier::with_attribution(HandRole::Minor, PinchAttribution::RoleSpecific);
        let mut major = GestureClassifier::with_attribution(HandRole::Major, PinchAttribution::RoleSpecific);
        assert_eq!(hold(&mut minor, &hand, 6), Gesture::PinchMinor);
        assert_eq!(hold(&mut major, &hand, 6), Gesture::PinchMajor);
    }

    #[test]
    fn role_agnostic_minor_reports_pinch_major() {
        let hand = HandPose::Pinch.landmarks(0.5, 0.5);
        let mut minor = GestureClassifier::new(HandRole::Minor);
        assert_eq!(hold(&mut minor, &hand, 6), Gesture::PinchMajor);
    }

    #[test]
    fn unrecognized_codes_still_debounce() {
        let mut pts = *HandPose::Open.landmarks(0.5, 0.5).points();
        // Fold the middle finger: 1011 has no name.
        let mcp = pts[index::MIDDLE_MCP];
        pts[index::MIDDLE_TIP] = Landmark::new(mcp.x, mcp.y + 0.03, 0.0);
        let hand = LandmarkSet::new(pts);
        let mut c = GestureClassifier::new(HandRole::Major);
        assert_eq!(hold(&mut c, &hand, 6), Gesture::Unrecognized(FingerState::from_bits(0b1011)));
    }
}
