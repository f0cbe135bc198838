//! Synthetic upright hands.
//!
//! Used by the keyboard simulator and by tests to produce realistic
//! skeletons without a tracker.  Every pose is anchored on the middle MCP
//! (landmark 9) at `(cx, cy)` with the wrist below it.

use crate::landmark::{index, Landmark, LandmarkSet, LANDMARK_COUNT};

const WRIST_DROP:   f32 = 0.15;
const PIP_RISE:     f32 = 0.045;
const DIP_RISE:     f32 = 0.08;
const TIP_RISE:     f32 = 0.11;
const FOLD_DROP:    f32 = 0.03;

/// Horizontal offset of each finger's MCP from the middle MCP.
const MCP_OFFSETS: [f32; 4] = [-0.03, 0.0, 0.03, 0.055];

/// Canned hand shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandPose {
    Fist,
    /// All four fingers up (classifies as `Last4`).
    Open,
    Index,
    Mid,
    VGest,
    TwoFingerClosed,
    /// Index curled onto the thumb, other three fingers up.
    Pinch,
    ThreeFingerScroll,
}

impl HandPose {
    pub const ALL: [HandPose; 8] = [
        HandPose::Fist,
        HandPose::Open,
        HandPose::Index,
        HandPose::Mid,
        HandPose::VGest,
        HandPose::TwoFingerClosed,
        HandPose::Pinch,
        HandPose::ThreeFingerScroll,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HandPose::Fist              => "fist",
            HandPose::Open              => "open",
            HandPose::Index             => "index",
            HandPose::Mid               => "mid",
            HandPose::VGest             => "v",
            HandPose::TwoFingerClosed   => "two closed",
            HandPose::Pinch             => "pinch",
            HandPose::ThreeFingerScroll => "three",
        }
    }

    /// `[index, middle, ring, pinky]` raised flags.
    fn raised(self) -> [bool; 4] {
        match self {
            HandPose::Fist              => [false, false, false, false],
            HandPose::Open              => [true,  true,  true,  true ],
            HandPose::Index             => [true,  false, false, false],
            HandPose::Mid               => [false, true,  false, false],
            HandPose::VGest             => [true,  true,  false, false],
            HandPose::TwoFingerClosed   => [true,  true,  false, false],
            HandPose::Pinch             => [false, true,  true,  true ],
            HandPose::ThreeFingerScroll => [true,  true,  true,  false],
        }
    }

    /// Sideways lean of each fingertip.
    fn tip_spread(self) -> [f32; 4] {
        match self {
            HandPose::VGest           => [-0.03, 0.03, 0.0, 0.0],
            HandPose::TwoFingerClosed => [0.008, -0.008, 0.0, 0.0],
            _                         => [0.0; 4],
        }
    }

    /// Build the 21 landmarks with the middle MCP at `(cx, cy)`.
    pub fn landmarks(self, cx: f32, cy: f32) -> LandmarkSet {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        pts[index::WRIST] = Landmark::new(cx, cy + WRIST_DROP, 0.0);

        let raised = self.raised();
        let spread = self.tip_spread();
        for finger in 0..4 {
            let mcp = index::INDEX_MCP + finger * 4;
            let x   = cx + MCP_OFFSETS[finger];
            pts[mcp] = Landmark::new(x, cy, 0.0);
            if raised[finger] {
                let lean = spread[finger];
                pts[mcp + 1] = Landmark::new(x + lean * 0.4, cy - PIP_RISE, 0.0);
                pts[mcp + 2] = Landmark::new(x + lean * 0.7, cy - DIP_RISE, 0.0);
                pts[mcp + 3] = Landmark::new(x + lean,       cy - TIP_RISE, 0.0);
            } else {
                pts[mcp + 1] = Landmark::new(x, cy - FOLD_DROP, 0.0);
                pts[mcp + 2] = Landmark::new(x, cy, 0.0);
                pts[mcp + 3] = Landmark::new(x, cy + FOLD_DROP, 0.0);
            }
        }

        pts[index::THUMB_CMC] = Landmark::new(cx - 0.05, cy + 0.12, 0.0);
        pts[index::THUMB_MCP] = Landmark::new(cx - 0.08, cy + 0.08, 0.0);
        pts[index::THUMB_IP]  = Landmark::new(cx - 0.10, cy + 0.05, 0.0);
        pts[index::THUMB_TIP] = if self == HandPose::Pinch {
            let tip = pts[index::INDEX_TIP];
            Landmark::new(tip.x - 0.01, tip.y + 0.005, 0.0)
        } else {
            Landmark::new(cx - 0.115, cy + 0.02, 0.0)
        };

        LandmarkSet::new(pts)
    }
}
