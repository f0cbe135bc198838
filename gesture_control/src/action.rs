//! Output vocabulary and the actuation seam.
//!
//! The coordinator never touches the OS directly: it emits [`Action`]s to an
//! [`Actuator`].  Backends live elsewhere (desktop, dry-run); this module
//! also carries [`RecordingActuator`], the in-memory backend used in tests.

use std::fmt;

use anyhow::{anyhow, Result};

/// Wheel units emitted per scroll tick.
pub const SCROLL_STEP: i32 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

// ════════════════════════════════════════════════════════════════════════════
// Action
// ════════════════════════════════════════════════════════════════════════════

/// One side-effecting request for the host machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Absolute screen position in pixels.
    MoveCursor { x: f64, y: f64 },
    /// Press and hold the primary button (drag start).
    PressPrimary,
    ReleasePrimary,
    ClickPrimary,
    ClickSecondary,
    DoubleClick,
    /// `amount` is in wheel units, positive = up / right.
    Scroll { axis: ScrollAxis, amount: i32 },
    /// Fraction of full scale to add; the backend clamps to `[0, 1]`.
    AdjustVolume { delta: f32 },
    AdjustBrightness { delta: f32 },
}

impl Action {
    pub fn is_level(&self) -> bool {
        matches!(self, Action::AdjustVolume { .. } | Action::AdjustBrightness { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveCursor { x, y } => write!(f, "move {:.0},{:.0}", x, y),
            Action::PressPrimary        => f.write_str("press"),
            Action::ReleasePrimary      => f.write_str("release"),
            Action::ClickPrimary        => f.write_str("click"),
            Action::ClickSecondary      => f.write_str("right click"),
            Action::DoubleClick         => f.write_str("double click"),
            Action::Scroll { axis: ScrollAxis::Vertical, amount } => {
                write!(f, "scroll {:+}", amount)
            }
            Action::Scroll { axis: ScrollAxis::Horizontal, amount } => {
                write!(f, "hscroll {:+}", amount)
            }
            Action::AdjustVolume { delta }     => write!(f, "volume {:+.3}", delta),
            Action::AdjustBrightness { delta } => write!(f, "brightness {:+.3}", delta),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Actuator
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can carry out [`Action`]s on a host.
pub trait Actuator {
    /// Display size in pixels.
    fn screen_size(&self) -> (u32, u32);

    /// Where the system cursor is right now.
    fn cursor_position(&mut self) -> Result<(f64, f64)>;

    fn perform(&mut self, action: &Action) -> Result<()>;
}

// ── recording backend ─────────────────────────────────────────────────────

/// Keeps every performed action in memory and tracks a virtual cursor.
#[derive(Clone, Debug)]
pub struct RecordingActuator {
    pub actions:     Vec<Action>,
    pub cursor:      (f64, f64),
    pub screen:      (u32, u32),
    /// When set, level adjustments fail as an unavailable backend would.
    pub fail_levels: bool,
}

impl RecordingActuator {
    pub fn new(width: u32, height: u32) -> Self {
        RecordingActuator {
            actions:     Vec::new(),
            cursor:      (width as f64 / 2.0, height as f64 / 2.0),
            screen:      (width, height),
            fail_levels: false,
        }
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    pub fn count(&self, wanted: &Action) -> usize {
        self.actions.iter().filter(|a| *a == wanted).count()
    }
}

impl Actuator for RecordingActuator {
    fn screen_size(&self) -> (u32, u32) {
        self.screen
    }

    fn cursor_position(&mut self) -> Result<(f64, f64)> {
        Ok(self.cursor)
    }

    fn perform(&mut self, action: &Action) -> Result<()> {
        self.actions.push(*action);
        if let Action::MoveCursor { x, y } = *action {
            self.cursor = (x, y);
        }
        if self.fail_levels && action.is_level() {
            return Err(anyhow!("level backend unavailable"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_tracks_cursor_moves() {
        let mut r = RecordingActuator::new(1000, 800);
        assert_eq!(r.cursor_position().unwrap(), (500.0, 400.0));
        r.perform(&Action::MoveCursor { x: 10.0, y: 20.0 }).unwrap();
        assert_eq!(r.cursor, (10.0, 20.0));
        assert_eq!(r.take().len(), 1);
        assert!(r.actions.is_empty());
    }

    #[test]
    fn recorder_can_fail_levels() {
        let mut r = RecordingActuator::new(100, 100);
        r.fail_levels = true;
        assert!(r.perform(&Action::AdjustVolume { delta: 0.1 }).is_err());
        assert!(r.perform(&Action::ClickPrimary).is_ok());
        assert_eq!(r.actions.len(), 2);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Action::Scroll { axis: ScrollAxis::Vertical, amount: -120 }.to_string(), "scroll -120");
        assert_eq!(Action::AdjustVolume { delta: 0.01 }.to_string(), "volume +0.010");
    }
}
