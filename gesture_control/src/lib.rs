//! # gesture_control
//!
//! Cross-frame control logic sitting between the gesture classifier and the
//! host machine.
//!
//! ```text
//!   major stable gesture ─┐
//!                         ├─▶ ControlCoordinator ─▶ Action ─▶ Actuator
//!   minor stable gesture ─┘        │
//!                                  ├─ CursorSmoother  (relative, damped)
//!                                  └─ PinchTracker ×2 (major: levels, minor: scroll)
//! ```
//!
//! The coordinator is the only owner of drag / click / pinch flags, so a
//! held button is released exactly once whichever way the hand leaves the
//! fist.

pub mod action;
pub mod coordinator;
pub mod cursor;
pub mod levels;
pub mod pinch;

pub use action::{Action, Actuator, RecordingActuator, ScrollAxis, SCROLL_STEP};
pub use coordinator::{pinch_action, ArmingFlags, ControlCoordinator, HandInput, LEVEL_DIVISOR};
pub use cursor::{damping_ratio, CursorSmoother};
pub use levels::{nudge_level, LevelControl};
pub use pinch::{PinchAxis, PinchTick, PinchTracker, PINCH_THRESHOLD, SETTLE_FRAMES};
