//! Actuators for a real desktop.
//!
//! [`EnigoActuator`] injects synthetic mouse input and routes level
//! adjustments to the configured [`LevelControl`]s.  [`DryRunActuator`]
//! only logs what would have happened.

use std::fmt::Debug;

use anyhow::{anyhow, Result};
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings};
use tracing::{debug, info};

use gesture_control::{nudge_level, Action, Actuator, LevelControl, ScrollAxis, SCROLL_STEP};

use crate::config::ScreenSize;

/// Display size assumed when nothing better is known.
pub const FALLBACK_SCREEN: (u32, u32) = (1920, 1080);

fn input<T, E: Debug>(result: std::result::Result<T, E>) -> Result<T> {
    result.map_err(|e| anyhow!("{:?}", e))
}

/// Wheel units to notches.  Vertical notches are positive downward.
pub fn wheel_notches(axis: ScrollAxis, amount: i32) -> i32 {
    let notches = amount / SCROLL_STEP;
    match axis {
        ScrollAxis::Vertical   => -notches,
        ScrollAxis::Horizontal => notches,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EnigoActuator
// ════════════════════════════════════════════════════════════════════════════

pub struct EnigoActuator {
    enigo:      Enigo,
    screen:     (u32, u32),
    volume:     Box<dyn LevelControl>,
    brightness: Box<dyn LevelControl>,
}

impl EnigoActuator {
    /// Connect to the display server.  `screen` overrides the detected size.
    pub fn new(
        screen: Option<ScreenSize>,
        volume: Box<dyn LevelControl>,
        brightness: Box<dyn LevelControl>,
    ) -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("failed to connect input backend: {:?}", e))?;

        let screen = match screen {
            Some(s) => (s.width, s.height),
            None => {
                let (w, h) = input(enigo.main_display())?;
                (w.max(1) as u32, h.max(1) as u32)
            }
        };
        info!(width = screen.0, height = screen.1, "desktop actuator ready");

        Ok(EnigoActuator { enigo, screen, volume, brightness })
    }
}

impl Actuator for EnigoActuator {
    fn screen_size(&self) -> (u32, u32) {
        self.screen
    }

    fn cursor_position(&mut self) -> Result<(f64, f64)> {
        let (x, y) = input(self.enigo.location())?;
        Ok((x as f64, y as f64))
    }

    fn perform(&mut self, action: &Action) -> Result<()> {
        match *action {
            Action::MoveCursor { x, y } => {
                input(self.enigo.move_mouse(x.round() as i32, y.round() as i32, Coordinate::Abs))
            }
            Action::PressPrimary   => input(self.enigo.button(Button::Left, Direction::Press)),
            Action::ReleasePrimary => input(self.enigo.button(Button::Left, Direction::Release)),
            Action::ClickPrimary   => input(self.enigo.button(Button::Left, Direction::Click)),
            Action::ClickSecondary => input(self.enigo.button(Button::Right, Direction::Click)),
            Action::DoubleClick => {
                input(self.enigo.button(Button::Left, Direction::Click))?;
                input(self.enigo.button(Button::Left, Direction::Click))
            }
            Action::Scroll { axis, amount } => {
                let enigo_axis = match axis {
                    ScrollAxis::Vertical   => Axis::Vertical,
                    ScrollAxis::Horizontal => Axis::Horizontal,
                };
                input(self.enigo.scroll(wheel_notches(axis, amount), enigo_axis))
            }
            Action::AdjustVolume { delta } => {
                let level = nudge_level(self.volume.as_mut(), delta)?;
                debug!(level, "volume set");
                Ok(())
            }
            Action::AdjustBrightness { delta } => {
                let level = nudge_level(self.brightness.as_mut(), delta)?;
                debug!(level, "brightness set");
                Ok(())
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DryRunActuator
// ════════════════════════════════════════════════════════════════════════════

/// Logs every action and tracks a virtual cursor.
#[derive(Clone, Debug)]
pub struct DryRunActuator {
    screen:    (u32, u32),
    cursor:    (f64, f64),
    performed: u64,
}

impl DryRunActuator {
    pub fn new(screen: Option<ScreenSize>) -> Self {
        let screen = screen.map(|s| (s.width, s.height)).unwrap_or(FALLBACK_SCREEN);
        DryRunActuator {
            screen,
            cursor:    (screen.0 as f64 / 2.0, screen.1 as f64 / 2.0),
            performed: 0,
        }
    }

    pub fn performed(&self) -> u64 {
        self.performed
    }
}

impl Actuator for DryRunActuator {
    fn screen_size(&self) -> (u32, u32) {
        self.screen
    }

    fn cursor_position(&mut self) -> Result<(f64, f64)> {
        Ok(self.cursor)
    }

    fn perform(&mut self, action: &Action) -> Result<()> {
        self.performed += 1;
        match *action {
            Action::MoveCursor { x, y } => {
                self.cursor = (x, y);
                debug!(%action, "dry run");
            }
            _ => info!(%action, "dry run"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notches_follow_wheel_direction() {
        assert_eq!(wheel_notches(ScrollAxis::Vertical, 120), -1);
        assert_eq!(wheel_notches(ScrollAxis::Vertical, -120), 1);
        assert_eq!(wheel_notches(ScrollAxis::Horizontal, 120), 1);
        assert_eq!(wheel_notches(ScrollAxis::Horizontal, -240), -2);
    }

    #[test]
    fn dry_run_tracks_cursor() {
        let mut a = DryRunActuator::new(Some(ScreenSize { width: 800, height: 600 }));
        assert_eq!(a.screen_size(), (800, 600));
        assert_eq!(a.cursor_position().unwrap(), (400.0, 300.0));

        a.perform(&Action::MoveCursor { x: 12.0, y: 34.0 }).unwrap();
        a.perform(&Action::AdjustVolume { delta: 0.01 }).unwrap();
        assert_eq!(a.cursor_position().unwrap(), (12.0, 34.0));
        assert_eq!(a.performed(), 2);
    }

    #[test]
    fn dry_run_default_screen() {
        assert_eq!(DryRunActuator::new(None).screen_size(), FALLBACK_SCREEN);
    }
}
