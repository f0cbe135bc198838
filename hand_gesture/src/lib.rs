//! # hand_gesture
//!
//! Turns one hand's 21-point skeleton into a temporally stable gesture.
//!
//! Each frame runs two steps per hand:
//!
//! 1. [`FingerState`]: which of the four non-thumb fingers are raised,
//!    packed MSB-first (index highest).
//! 2. [`GestureClassifier::get_gesture`]: map the finger bits plus a few
//!    geometric ratios to a [`Gesture`], then hold it back until the same
//!    instantaneous gesture has repeated for a full debounce window.
//!
//! ## Gesture table
//!
//! | Finger bits | Extra condition | Gesture |
//! |---|---|---|
//! | `0111` / `1111` | thumb tip within 0.05 of index tip | `PinchMajor` (`PinchMinor` for a role-specific minor hand) |
//! | `1110` | | `ThreeFingerScroll` |
//! | `1100` | tip spread / MCP spread > 1.7 | `VGest` |
//! | `1100` | tip depth gap < 0.1 | `TwoFingerClosed` |
//! | `1100` | otherwise | `Mid` |
//! | anything else | | the bit pattern itself (`Fist`, `Index`, `Last4`, …) |
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{Gesture, GestureClassifier, HandPose, HandRole};
//!
//! let mut major = GestureClassifier::new(HandRole::Major);
//! let fist = HandPose::Fist.landmarks(0.5, 0.5);
//!
//! for _ in 0..6 {
//!     major.update(Some(&fist));
//! }
//! assert_eq!(major.stable(), Gesture::Fist);
//! ```

pub mod classifier;
pub mod debounce;
pub mod finger;
pub mod gesture;
pub mod hand;
pub mod landmark;
pub mod pose;

pub use classifier::{classify_instantaneous, GestureClassifier, PinchAttribution};
pub use debounce::DebounceWindow;
pub use finger::{Finger, FingerState};
pub use gesture::Gesture;
pub use hand::{assign_roles, HandRole, RoleAssignment};
pub use landmark::{Frame, HandObservation, Handedness, Landmark, LandmarkSet, LANDMARK_COUNT};
pub use pose::HandPose;
