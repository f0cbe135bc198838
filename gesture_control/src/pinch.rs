//! Pinch-and-drift rate controller.
//!
//! While a pinch is held, the index fingertip's displacement from where the
//! pinch began is scaled ×10 and quantised against a 0.3 band.  Once the
//! displacement has stayed inside the band for [`SETTLE_FRAMES`] frames, the
//! next frame commits it as the level and emits one [`PinchTick`] for the
//! dominant axis.  Holding the drift keeps ticking every settle period.

use hand_gesture::Landmark;

/// Minimum displacement and re-trigger band, in scaled units.
pub const PINCH_THRESHOLD: f32 = 0.3;

/// Settled frames before a level is committed.
pub const SETTLE_FRAMES: u32 = 5;

const LEVEL_SCALE: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinchAxis {
    Horizontal,
    Vertical,
}

/// One committed step of a pinch drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchTick {
    pub axis:  PinchAxis,
    /// Committed level; positive is rightward or upward.
    pub level: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// PinchTracker
// ════════════════════════════════════════════════════════════════════════════

/// State for one hand role's pinch.
#[derive(Clone, Debug, Default)]
pub struct PinchTracker {
    origin:     (f32, f32),
    level:      f32,
    prev_level: f32,
    frames:     u32,
    axis:       Option<PinchAxis>,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pinch at `tip`.
    pub fn init(&mut self, tip: &Landmark) {
        *self = PinchTracker { origin: (tip.x, tip.y), ..PinchTracker::default() };
    }

    /// Drop all state (pinch released).
    pub fn reset(&mut self) {
        *self = PinchTracker::default();
    }

    pub fn origin(&self) -> (f32, f32) { self.origin }
    pub fn level(&self) -> f32 { self.level }
    pub fn prev_level(&self) -> f32 { self.prev_level }
    pub fn settled_frames(&self) -> u32 { self.frames }
    pub fn axis(&self) -> Option<PinchAxis> { self.axis }

    /// Advance one pinch frame with the current index tip.
    ///
    /// A pending commit from the previous frames is handled first, before
    /// the new displacement is measured.
    pub fn update(&mut self, tip: &Landmark) -> Option<PinchTick> {
        let mut tick = None;
        if self.frames == SETTLE_FRAMES {
            self.frames = 0;
            self.level  = self.prev_level;
            tick = self.axis.map(|axis| PinchTick { axis, level: self.level });
        }

        let lvx = (tip.x - self.origin.0) * LEVEL_SCALE;
        let lvy = (self.origin.1 - tip.y) * LEVEL_SCALE;

        if lvy.abs() > lvx.abs() && lvy.abs() > PINCH_THRESHOLD {
            self.settle(PinchAxis::Vertical, lvy);
        } else if lvx.abs() > PINCH_THRESHOLD {
            self.settle(PinchAxis::Horizontal, lvx);
        }

        tick
    }

    fn settle(&mut self, axis: PinchAxis, displacement: f32) {
        self.axis = Some(axis);
        if (self.prev_level - displacement).abs() < PINCH_THRESHOLD {
            self.frames += 1;
        } else {
            self.prev_level = displacement;
            self.frames     = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tip(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    fn run(t: &mut PinchTracker, points: &[(f32, f32)]) -> Vec<PinchTick> {
        points.iter().filter_map(|&(x, y)| t.update(&tip(x, y))).collect()
    }

    #[test]
    fn small_motion_selects_no_axis() {
        let mut t = PinchTracker::new();
        t.init(&tip(0.5, 0.5));
        let ticks = run(&mut t, &[(0.51, 0.5), (0.52, 0.49), (0.5, 0.48)]);
        assert!(ticks.is_empty());
        assert_eq!(t.axis(), None);
        assert_eq!(t.settled_frames(), 0);
    }

    #[test]
    fn settled_horizontal_drift_commits_once() {
        let mut t = PinchTracker::new();
        t.init(&tip(0.25, 0.5));
        // Grows 0.1 per frame inside the threshold, then jumps to 0.5.
        let ticks = run(&mut t, &[(0.26, 0.5), (0.27, 0.5)]);
        assert!(ticks.is_empty());

        let mut ticks = Vec::new();
        for _ in 0..6 {
            ticks.extend(t.update(&tip(0.30, 0.5)));
        }
        assert!(ticks.is_empty(), "five settled frames alone do not commit");
        assert_eq!(t.settled_frames(), SETTLE_FRAMES);

        let tick = t.update(&tip(0.30, 0.5)).expect("commit on the next frame");
        assert_eq!(tick.axis, PinchAxis::Horizontal);
        assert!((tick.level - 0.5).abs() < 1e-4);
        assert!((t.level() - 0.5).abs() < 1e-4);
        assert_eq!(t.settled_frames(), 1);
    }

    #[test]
    fn vertical_is_inverted_so_up_is_positive() {
        let mut t = PinchTracker::new();
        t.init(&tip(0.5, 0.5));
        let ticks = run(&mut t, &[(0.5, 0.44); 7]);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].axis, PinchAxis::Vertical);
        assert!(ticks[0].level > 0.5);
    }

    #[test]
    fn sustained_drift_keeps_ticking() {
        let mut t = PinchTracker::new();
        t.init(&tip(0.5, 0.5));
        let ticks = run(&mut t, &[(0.5, 0.58); 19]);
        // Frame 1 sets the level, frames 2-6 settle, 7 commits, then every fifth frame.
        assert_eq!(ticks.len(), 3);
        assert!(ticks.iter().all(|k| k.axis == PinchAxis::Vertical && k.level < 0.0));
    }

    #[test]
    fn moving_level_restarts_settling() {
        let mut t = PinchTracker::new();
        t.init(&tip(0.5, 0.5));
        let ticks = run(&mut t, &[(0.55, 0.5), (0.55, 0.5), (0.55, 0.5), (0.60, 0.5)]);
        assert!(ticks.is_empty());
        assert!((t.prev_level() - 1.0).abs() < 1e-4);
        assert_eq!(t.settled_frames(), 0);
    }

    #[test]
    fn one_axis_per_commit() {
        let mut t = PinchTracker::new();
        t.init(&tip(0.5, 0.5));
        let ticks = run(&mut t, &[(0.56, 0.43); 14]);
        assert_eq!(ticks.len(), 2);
        assert!(ticks.iter().all(|k| k.axis == PinchAxis::Vertical));
    }

    #[test]
    fn init_clears_previous_pinch() {
        let mut t = PinchTracker::new();
        t.init(&tip(0.5, 0.5));
        run(&mut t, &[(0.6, 0.5); 8]);
        t.init(&tip(0.2, 0.2));
        assert_eq!(t.origin(), (0.2, 0.2));
        assert_eq!(t.level(), 0.0);
        assert_eq!(t.settled_frames(), 0);
        assert_eq!(t.axis(), None);
    }
}
