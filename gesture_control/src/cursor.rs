//! Relative, damped cursor motion.

/// Squared pixel motion at or below which the cursor does not move.
pub const DEAD_ZONE_SQ: f64 = 25.0;

/// Squared pixel motion above which the fast-flick multiplier applies.
pub const FLICK_SQ: f64 = 900.0;

const RAMP_GAIN:  f64 = 0.07;
const FLICK_GAIN: f64 = 2.1;

/// Gain applied to a raw hand delta with squared length `d2`.
pub fn damping_ratio(d2: f64) -> f64 {
    if d2 <= DEAD_ZONE_SQ {
        0.0
    } else if d2 <= FLICK_SQ {
        RAMP_GAIN * d2.sqrt()
    } else {
        FLICK_GAIN
    }
}

/// Remembers where the tracked hand point was last frame.
///
/// Motion is relative: the output is the current cursor plus the damped
/// hand delta, so the cursor may drift away from the hand's absolute
/// position near the screen edges.
#[derive(Clone, Debug, Default)]
pub struct CursorSmoother {
    prev_hand: Option<(i32, i32)>,
}

impl CursorSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw hand position last seen, in screen pixels.
    pub fn anchor(&self) -> Option<(i32, i32)> {
        self.prev_hand
    }

    /// Forget the anchor; the next call reseeds instead of jumping.
    pub fn invalidate(&mut self) {
        self.prev_hand = None;
    }

    /// Damped absolute target for the cursor currently at `current`.
    ///
    /// The first call after construction or [`invalidate`](Self::invalidate)
    /// seeds the anchor and returns `current` unchanged.
    pub fn resolve(&mut self, raw: (i32, i32), current: (f64, f64)) -> (f64, f64) {
        let (px, py) = self.prev_hand.unwrap_or(raw);
        self.prev_hand = Some(raw);

        let dx = (i64::from(raw.0) - i64::from(px)) as f64;
        let dy = (i64::from(raw.1) - i64::from(py)) as f64;
        let ratio = damping_ratio(dx * dx + dy * dy);
        (current.0 + dx * ratio, current.1 + dy * ratio)
    }
}
