//! Hand skeleton types as delivered by an upstream tracker.
//!
//! Coordinates are normalized to the frame: `x` grows rightward, `y` grows
//! downward, both in `[0, 1]`.  `z` is a relative, unitless depth.

use serde::{Deserialize, Serialize};

/// Number of skeletal points in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Fixed landmark indices of the 21-point hand model.
pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One tracked skeletal point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Euclidean distance in the image plane (depth ignored).
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Planar distance, negated unless `self` sits above `other` on screen.
    pub fn signed_distance(&self, other: &Landmark) -> f32 {
        let d = self.planar_distance(other);
        if self.y < other.y { d } else { -d }
    }

    /// Absolute depth difference.
    pub fn depth_gap(&self, other: &Landmark) -> f32 {
        (self.z - other.z).abs()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSet: a validated 21-point hand
// ════════════════════════════════════════════════════════════════════════════

/// Exactly [`LANDMARK_COUNT`] points, immutable for the frame that made it.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        LandmarkSet { points }
    }

    /// Validate a raw point list.  Partial or oversized hands yield `None`.
    pub fn from_points(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite())) {
            return None;
        }
        Some(LandmarkSet { points })
    }

    /// Point at a fixed skeletal index (see [`index`]).
    ///
    /// # Panics
    /// If `i >= LANDMARK_COUNT`.
    pub fn get(&self, i: usize) -> &Landmark {
        &self.points[i]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.points[a].planar_distance(&self.points[b])
    }

    pub fn signed_distance(&self, a: usize, b: usize) -> f32 {
        self.points[a].signed_distance(&self.points[b])
    }

    pub fn depth_gap(&self, a: usize, b: usize) -> f32 {
        self.points[a].depth_gap(&self.points[b])
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Frame: what a tracker hands us each tick
// ════════════════════════════════════════════════════════════════════════════

/// Left/right label reported by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(alias = "left")]
    Left,
    #[serde(alias = "right")]
    Right,
}

impl Handedness {
    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left  => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

/// One hand as observed in a frame.  `landmarks` is unvalidated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub landmarks:  Vec<Landmark>,
}

impl HandObservation {
    pub fn new(handedness: Handedness, landmarks: &LandmarkSet) -> Self {
        HandObservation { handedness, landmarks: landmarks.points().to_vec() }
    }

    pub fn landmark_set(&self) -> Option<LandmarkSet> {
        LandmarkSet::from_points(&self.landmarks)
    }
}

/// Zero, one, or two hands seen in a single captured frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl Frame {
    pub fn empty() -> Self {
        Frame::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}
