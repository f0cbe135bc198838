//! Frame-level dispatch from stable gestures to actions.
//!
//! [`ControlCoordinator`] owns every cross-frame flag: drag, click arming,
//! the two pinch trackers and the cursor anchor.  It is driven once per
//! frame, after both hand classifiers have run.
//!
//! | Gesture | Effect |
//! |---|---|
//! | `VGest` | arm a click, move the cursor |
//! | `Fist` | press and hold on entry, move the cursor every frame |
//! | `Mid` (armed) | primary click |
//! | `Index` (armed) | secondary click |
//! | `TwoFingerClosed` (armed) | double click |
//! | `PinchMajor` | brightness (horizontal) / volume (vertical) ticks |
//! | `PinchMinor` | horizontal / vertical scroll ticks |
//! | anything else | nothing |

use tracing::{debug, info, warn};

use hand_gesture::{landmark::index, Gesture, HandRole, LandmarkSet};

use crate::action::{Action, Actuator, ScrollAxis, SCROLL_STEP};
use crate::cursor::CursorSmoother;
use crate::pinch::{PinchAxis, PinchTick, PinchTracker};

/// Committed pinch level divided by this is the volume/brightness delta.
pub const LEVEL_DIVISOR: f32 = 50.0;

/// Booleans recording actions in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArmingFlags {
    /// Primary button is held down.
    pub drag:        bool,
    /// A V gesture was seen; the next MID/INDEX/TWO_FINGER_CLOSED clicks.
    pub click_armed: bool,
    pub pinch_major: bool,
    pub pinch_minor: bool,
}

/// One hand's input to a frame: its stable gesture and landmarks.
pub type HandInput<'a> = Option<(Gesture, &'a LandmarkSet)>;

// ════════════════════════════════════════════════════════════════════════════
// ControlCoordinator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct ControlCoordinator {
    flags:       ArmingFlags,
    cursor:      CursorSmoother,
    major_pinch: PinchTracker,
    minor_pinch: PinchTracker,
    last_cursor: Option<(f64, f64)>,
    last_action: Option<Action>,
}

impl ControlCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> ArmingFlags { self.flags }
    pub fn cursor(&self) -> &CursorSmoother { &self.cursor }
    pub fn last_action(&self) -> Option<Action> { self.last_action }

    pub fn pinch(&self, role: HandRole) -> &PinchTracker {
        match role {
            HandRole::Major => &self.major_pinch,
            HandRole::Minor => &self.minor_pinch,
        }
    }

    /// Drive one frame.
    ///
    /// With no hands at all, this is an implicit cancel.  Otherwise the
    /// minor hand is acted on only while it holds a `PinchMinor`; every
    /// other frame dispatches the major hand (a missing major hand is
    /// evaluated as `Palm`).
    pub fn process_frame<A: Actuator + ?Sized>(
        &mut self,
        major: HandInput<'_>,
        minor: HandInput<'_>,
        actuator: &mut A,
    ) {
        if major.is_none() && minor.is_none() {
            self.hands_lost(actuator);
            return;
        }

        match (major, minor) {
            (_, Some((Gesture::PinchMinor, hand))) => {
                self.handle_controls(Gesture::PinchMinor, HandRole::Minor, Some(hand), actuator);
            }
            (Some((gesture, hand)), _) => {
                self.handle_controls(gesture, HandRole::Major, Some(hand), actuator);
            }
            (None, _) => {
                self.handle_controls(Gesture::Palm, HandRole::Major, None, actuator);
            }
        }
    }

    /// No hand in view: drop the cursor anchor, let go of a held drag and
    /// forget any pinch.
    pub fn hands_lost<A: Actuator + ?Sized>(&mut self, actuator: &mut A) {
        self.cursor.invalidate();
        if self.flags.drag {
            self.flags.drag = false;
            info!("hands lost, releasing drag");
            self.dispatch(Action::ReleasePrimary, actuator);
        }
        self.end_pinch(HandRole::Major);
        self.end_pinch(HandRole::Minor);
    }

    /// Act on one hand's stable gesture.
    ///
    /// Arming flags whose driving gesture is gone are cleared first (a held
    /// drag is released exactly once), then the gesture's own effect runs.
    /// Unrecognised gestures only take part in that reset.
    pub fn handle_controls<A: Actuator + ?Sized>(
        &mut self,
        gesture: Gesture,
        role: HandRole,
        hand: Option<&LandmarkSet>,
        actuator: &mut A,
    ) {
        let hand = match hand {
            Some(hand) if gesture != Gesture::Palm && gesture.is_recognized() => hand,
            _ => {
                let gesture = if hand.is_some() { gesture } else { Gesture::Palm };
                if !gesture.is_recognized() {
                    debug!(role = role.name(), %gesture, "ignoring unrecognized gesture");
                }
                self.release_stale(gesture, actuator);
                return;
            }
        };

        let (x, y) = self.resolve_cursor_target(hand, actuator);
        self.release_stale(gesture, actuator);

        match gesture {
            Gesture::VGest => {
                self.flags.click_armed = true;
                self.move_cursor(x, y, actuator);
            }
            Gesture::Fist => {
                if !self.flags.drag {
                    self.flags.drag = true;
                    self.dispatch(Action::PressPrimary, actuator);
                }
                self.move_cursor(x, y, actuator);
            }
            Gesture::Mid if self.flags.click_armed => {
                self.flags.click_armed = false;
                self.dispatch(Action::ClickPrimary, actuator);
            }
            Gesture::Index if self.flags.click_armed => {
                self.flags.click_armed = false;
                self.dispatch(Action::ClickSecondary, actuator);
            }
            Gesture::TwoFingerClosed if self.flags.click_armed => {
                self.flags.click_armed = false;
                self.dispatch(Action::DoubleClick, actuator);
            }
            Gesture::PinchMajor => self.pinch_control(HandRole::Major, hand, actuator),
            Gesture::PinchMinor => self.pinch_control(HandRole::Minor, hand, actuator),
            _ => {}
        }
    }

    /// Map the middle MCP to a damped absolute screen position.
    pub fn resolve_cursor_target<A: Actuator + ?Sized>(
        &mut self,
        hand: &LandmarkSet,
        actuator: &mut A,
    ) -> (f64, f64) {
        let (w, h) = actuator.screen_size();
        let p = hand.get(index::MIDDLE_MCP);
        // Trackers report points slightly outside the frame; pin them to its edge.
        let raw = (
            (p.x.clamp(0.0, 1.0) * w as f32) as i32,
            (p.y.clamp(0.0, 1.0) * h as f32) as i32,
        );

        let current = match actuator.cursor_position() {
            Ok(pos) => pos,
            Err(e) => {
                debug!(error = %e, "cursor position unavailable, using last emitted");
                self.last_cursor.unwrap_or((w as f64 / 2.0, h as f64 / 2.0))
            }
        };
        self.cursor.resolve(raw, current)
    }

    /// Clear every flag whose driving gesture is not `gesture`.
    fn release_stale<A: Actuator + ?Sized>(&mut self, gesture: Gesture, actuator: &mut A) {
        if gesture != Gesture::Fist && self.flags.drag {
            self.flags.drag = false;
            self.dispatch(Action::ReleasePrimary, actuator);
        }
        if gesture != Gesture::PinchMajor {
            self.end_pinch(HandRole::Major);
        }
        if gesture != Gesture::PinchMinor {
            self.end_pinch(HandRole::Minor);
        }
    }

    // ── pinch ─────────────────────────────────────────────────────────────

    fn pinch_control<A: Actuator + ?Sized>(
        &mut self,
        role: HandRole,
        hand: &LandmarkSet,
        actuator: &mut A,
    ) {
        let tip = hand.get(index::INDEX_TIP);
        let (active, tracker) = match role {
            HandRole::Major => (&mut self.flags.pinch_major, &mut self.major_pinch),
            HandRole::Minor => (&mut self.flags.pinch_minor, &mut self.minor_pinch),
        };
        if !*active {
            *active = true;
            tracker.init(tip);
            debug!(role = role.name(), x = tip.x, y = tip.y, "pinch started");
        }
        if let Some(tick) = tracker.update(tip) {
            let action = pinch_action(role, tick);
            debug!(role = role.name(), level = tick.level, %action, "pinch tick");
            self.dispatch(action, actuator);
        }
    }

    fn end_pinch(&mut self, role: HandRole) {
        let (active, tracker) = match role {
            HandRole::Major => (&mut self.flags.pinch_major, &mut self.major_pinch),
            HandRole::Minor => (&mut self.flags.pinch_minor, &mut self.minor_pinch),
        };
        if *active {
            *active = false;
            tracker.reset();
        }
    }

    // ── output ────────────────────────────────────────────────────────────

    fn move_cursor<A: Actuator + ?Sized>(&mut self, x: f64, y: f64, actuator: &mut A) {
        self.last_cursor = Some((x, y));
        self.dispatch(Action::MoveCursor { x, y }, actuator);
    }

    /// Perform an action; failures are logged and otherwise ignored.
    fn dispatch<A: Actuator + ?Sized>(&mut self, action: Action, actuator: &mut A) {
        self.last_action = Some(action);
        if let Err(e) = actuator.perform(&action) {
            let reason = format!("{:#}", e);
            warn!(%action, error = %reason, "actuation failed");
        }
    }
}

/// Translate a committed pinch step into the role's action.
pub fn pinch_action(role: HandRole, tick: PinchTick) -> Action {
    let direction = if tick.level > 0.0 { SCROLL_STEP } else { -SCROLL_STEP };
    match (role, tick.axis) {
        (HandRole::Major, PinchAxis::Horizontal) => {
            Action::AdjustBrightness { delta: tick.level / LEVEL_DIVISOR }
        }
        (HandRole::Major, PinchAxis::Vertical) => {
            Action::AdjustVolume { delta: tick.level / LEVEL_DIVISOR }
        }
        (HandRole::Minor, PinchAxis::Horizontal) => {
            Action::Scroll { axis: ScrollAxis::Horizontal, amount: direction }
        }
        (HandRole::Minor, PinchAxis::Vertical) => {
            Action::Scroll { axis: ScrollAxis::Vertical, amount: direction }
        }
    }
}
