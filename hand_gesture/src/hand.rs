//! Major/minor hand roles.

use serde::{Deserialize, Serialize};

use crate::landmark::{Frame, HandObservation, Handedness};

/// Which tracked hand a classifier or pinch tracker belongs to.
///
/// The major hand is the dominant one; it drives the cursor, clicks, drag
/// and system levels.  The minor hand only scrolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandRole {
    Major,
    Minor,
}

impl HandRole {
    pub fn name(self) -> &'static str {
        match self {
            HandRole::Major => "major",
            HandRole::Minor => "minor",
        }
    }
}

/// The hands of one frame, sorted into roles.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleAssignment<'a> {
    pub major: Option<&'a HandObservation>,
    pub minor: Option<&'a HandObservation>,
}

impl<'a> RoleAssignment<'a> {
    pub fn get(&self, role: HandRole) -> Option<&'a HandObservation> {
        match role {
            HandRole::Major => self.major,
            HandRole::Minor => self.minor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.major.is_none() && self.minor.is_none()
    }
}

/// Sort a frame's hands into major/minor by the dominant side.
///
/// Only the first two observations are considered.  When both carry the
/// same label, the later one takes that role and the other role stays empty.
pub fn assign_roles(frame: &Frame, dominant: Handedness) -> RoleAssignment<'_> {
    let mut assignment = RoleAssignment::default();
    for hand in frame.hands.iter().take(2) {
        if hand.handedness == dominant {
            assignment.major = Some(hand);
        } else {
            assignment.minor = Some(hand);
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    fn obs(h: Handedness, x: f32) -> HandObservation {
        HandObservation { handedness: h, landmarks: vec![Landmark::new(x, 0.5, 0.0)] }
    }

    #[test]
    fn right_dominant_maps_right_to_major() {
        let frame = Frame { hands: vec![obs(Handedness::Left, 0.1), obs(Handedness::Right, 0.9)] };
        let roles = assign_roles(&frame, Handedness::Right);
        assert_eq!(roles.major.unwrap().landmarks[0].x, 0.9);
        assert_eq!(roles.minor.unwrap().landmarks[0].x, 0.1);
    }

    #[test]
    fn left_dominant_swaps_roles() {
        let frame = Frame { hands: vec![obs(Handedness::Left, 0.1), obs(Handedness::Right, 0.9)] };
        let roles = assign_roles(&frame, Handedness::Left);
        assert_eq!(roles.major.unwrap().landmarks[0].x, 0.1);
        assert_eq!(roles.get(HandRole::Minor).unwrap().landmarks[0].x, 0.9);
    }

    #[test]
    fn duplicate_labels_keep_the_later_hand() {
        let frame = Frame { hands: vec![obs(Handedness::Right, 0.2), obs(Handedness::Right, 0.7)] };
        let roles = assign_roles(&frame, Handedness::Right);
        assert_eq!(roles.major.unwrap().landmarks[0].x, 0.7);
        assert!(roles.minor.is_none());
    }

    #[test]
    fn empty_frame_has_no_roles() {
        assert!(assign_roles(&Frame::empty(), Handedness::Right).is_empty());
    }

    #[test]
    fn third_hand_is_ignored() {
        let frame = Frame {
            hands: vec![
                obs(Handedness::Left, 0.1),
                obs(Handedness::Right, 0.5),
                obs(Handedness::Left, 0.9),
            ],
        };
        let roles = assign_roles(&frame, Handedness::Right);
        assert_eq!(roles.minor.unwrap().landmarks[0].x, 0.1);
    }
}
