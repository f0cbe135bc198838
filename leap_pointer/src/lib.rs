//! # leap_pointer
//!
//! Hand-tracking pointer controller: classifies each tracked hand, turns
//! the stable gestures into cursor, click, scroll and system-level actions,
//! and performs them on the desktop.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | V (index + middle spread) | major | move cursor, arm a click |
//! | Fist | major | press and drag; released when the fist opens |
//! | Middle finger (after V) | major | left click |
//! | Index finger (after V) | major | right click |
//! | Index + middle together (after V) | major | double click |
//! | Pinch, drift sideways | major | brightness |
//! | Pinch, drift up/down | major | volume |
//! | Pinch, drift | minor | scroll (horizontal / vertical) |
//!
//! ## Feature flags
//!
//! * (default): **Simulation** and **replay**: keyboard-driven hands in the
//!   preview window, or a recorded JSON-lines session.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `1`..`8` | open, fist, V, middle, index, two closed, pinch, three fingers |
//! | arrows | move the active hand |
//! | `Tab` | switch active hand |
//! | `H` | show / hide the other hand |
//! | `Space` | show / hide the active hand |
//! | `Q` / `Escape` | quit |

pub mod app;
pub mod config;
pub mod desktop;
pub mod levels;
pub mod source;
pub mod visualizer;
