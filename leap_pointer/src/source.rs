//! Frame sources: LeapMotion hardware, keyboard simulation and replay.
//!
//! Every source runs on its own thread and delivers [`Frame`]s over an
//! `mpsc` channel.  The run loop does not know which one it is reading;
//! a source that finishes simply drops its sender.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use hand_gesture::{Frame, HandObservation, HandPose, Handedness, Landmark};

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait: unified interface for hardware, sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`Frame`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Frame>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<Frame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Horizontal half-width of the tracked volume, millimetres.
const LEAP_HALF_WIDTH_MM: f32 = 200.0;
/// Height above the device where the tracked volume starts.
const LEAP_FLOOR_MM:      f32 = 80.0;
/// Edge length of the tracked volume.
const LEAP_SPAN_MM:       f32 = 400.0;

/// Map a LeapMotion position (mm, y up, z toward the user) to normalized
/// image coordinates (x right, y down).
pub fn project_leap_point(x: f32, y: f32, z: f32) -> Landmark {
    Landmark::new(
        ((x + LEAP_HALF_WIDTH_MM) / LEAP_SPAN_MM).clamp(0.0, 1.0),
        (1.0 - (y - LEAP_FLOOR_MM) / LEAP_SPAN_MM).clamp(0.0, 1.0),
        z / LEAP_SPAN_MM,
    )
}

/// Frame source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Each digit contributes its four joints in the 21-point order: the
/// proximal bone's base (MCP, or CMC for the thumb), then the bases of the
/// intermediate and distal bones, then the fingertip.  The middle finger's
/// metacarpal base stands in for the wrist.
#[cfg(feature = "leap")]
pub struct LeapFrameSource;

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        if let Err(e) = track_leap(&tx) {
            let reason = format!("{:#}", e);
            tracing::error!(error = %reason, "LeapMotion source stopped");
        }
    }
}

#[cfg(feature = "leap")]
fn track_leap(tx: &Sender<Frame>) -> Result<()> {
    use anyhow::anyhow;
    use leaprs::{Connection, ConnectionConfig, Event, HandType};

    let mut connection = Connection::create(ConnectionConfig::default())
        .map_err(|e| anyhow!("failed to create LeapC connection: {:?}", e))?;
    connection
        .open()
        .map_err(|e| anyhow!("failed to open LeapMotion device: {:?}", e))?;
    info!("LeapMotion connection open");

    loop {
        let msg = match connection.poll(100) {
            Ok(m)  => m,
            Err(_) => continue,
        };

        if let Event::Tracking(frame) = msg.event() {
            let mut out = Frame::empty();
            for hand in frame.hands() {
                let handedness = match hand.hand_type() {
                    HandType::Left => Handedness::Left,
                    _              => Handedness::Right,
                };
                let digits: Vec<_> = hand.digits().collect();
                if digits.len() < 5 {
                    continue;
                }

                let mut points = Vec::with_capacity(hand_gesture::LANDMARK_COUNT);
                let w = digits[2].metacarpal().prev_joint();
                points.push(project_leap_point(w.x, w.y, w.z));
                for digit in &digits {
                    for joint in [
                        digit.proximal().prev_joint(),
                        digit.intermediate().prev_joint(),
                        digit.distal().prev_joint(),
                        digit.distal().next_joint(),
                    ] {
                        points.push(project_leap_point(joint.x, joint.y, joint.z));
                    }
                }
                out.hands.push(HandObservation { handedness, landmarks: points });
            }
            if tx.send(out).is_err() {
                return Ok(());
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource: keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the preview window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Put the active hand into a canned pose.
    Pose(HandPose),
    /// Nudge the active hand, in normalized units.
    Move { dx: f32, dy: f32 },
    /// Make the other hand the active one.
    SwitchHand,
    /// Show or hide the inactive hand.
    ToggleSecondHand,
    /// Show or hide the active hand.
    ToggleActiveHand,
    Quit,
}

/// One synthetic hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub pose:    HandPose,
    pub x:       f32,
    pub y:       f32,
    pub visible: bool,
}

/// Both synthetic hands and which one the keyboard drives.
#[derive(Clone, Debug, PartialEq)]
pub struct SimHands {
    pub right:  SimHand,
    pub left:   SimHand,
    pub active: Handedness,
}

impl Default for SimHands {
    fn default() -> Self {
        SimHands {
            right:  SimHand { pose: HandPose::Open, x: 0.6, y: 0.5, visible: true  },
            left:   SimHand { pose: HandPose::Open, x: 0.3, y: 0.5, visible: false },
            active: Handedness::Right,
        }
    }
}

impl SimHands {
    pub fn hand(&self, side: Handedness) -> &SimHand {
        match side {
            Handedness::Right => &self.right,
            Handedness::Left  => &self.left,
        }
    }

    fn hand_mut(&mut self, side: Handedness) -> &mut SimHand {
        match side {
            Handedness::Right => &mut self.right,
            Handedness::Left  => &mut self.left,
        }
    }

    /// Returns false on [`SimInput::Quit`].
    pub fn apply(&mut self, input: SimInput) -> bool {
        let active = self.active;
        match input {
            SimInput::Pose(pose) => self.hand_mut(active).pose = pose,
            SimInput::Move { dx, dy } => {
                let hand = self.hand_mut(active);
                hand.x = (hand.x + dx).clamp(0.1, 0.9);
                hand.y = (hand.y + dy).clamp(0.1, 0.8);
            }
            SimInput::SwitchHand => {
                self.active = active.opposite();
                self.hand_mut(self.active).visible = true;
            }
            SimInput::ToggleSecondHand => {
                let other = self.hand_mut(active.opposite());
                other.visible = !other.visible;
            }
            SimInput::ToggleActiveHand => {
                let hand = self.hand_mut(active);
                hand.visible = !hand.visible;
            }
            SimInput::Quit => return false,
        }
        true
    }

    /// Render the visible hands as a tracker frame.
    pub fn frame(&self) -> Frame {
        let mut frame = Frame::empty();
        for side in [Handedness::Right, Handedness::Left] {
            let hand = self.hand(side);
            if hand.visible {
                let points = hand.pose.landmarks(hand.x, hand.y);
                frame.hands.push(HandObservation::new(side, &points));
            }
        }
        frame
    }
}

/// Frame source driven by [`SimInput`] events from the preview window.
///
/// Emits the current synthetic hands every `tick`, whether or not a key
/// was pressed, so held poses pass the debounce window like real ones.
pub struct SimFrameSource {
    pub rx:   Receiver<SimInput>,
    pub tick: Duration,
}

impl SimFrameSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimFrameSource { rx, tick: Duration::from_millis(16) }
    }
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        let mut hands = SimHands::default();
        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(input) => {
                        if !hands.apply(input) {
                            return;
                        }
                        debug!(?input, "sim input");
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            if tx.send(hands.frame()).is_err() {
                return;
            }
            thread::sleep(self.tick);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayFrameSource: recorded JSON-lines sessions
// ════════════════════════════════════════════════════════════════════════════

/// Parse one replay line: a JSON [`Frame`].
pub fn parse_replay_line(line: &str) -> Result<Frame> {
    serde_json::from_str::<Frame>(line).context("invalid replay frame")
}

/// Plays back a file with one JSON frame per line.  Blank lines and lines
/// starting with `#` are ignored; malformed lines are logged and skipped.
pub struct ReplayFrameSource {
    path:   PathBuf,
    reader: BufReader<File>,
    pace:   Duration,
}

impl ReplayFrameSource {
    pub fn open(path: &Path, fps: u32) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed opening replay {}", path.display()))?;
        Ok(ReplayFrameSource {
            path:   path.to_path_buf(),
            reader: BufReader::new(file),
            pace:   Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        })
    }
}

impl FrameSource for ReplayFrameSource {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        let ReplayFrameSource { path, reader, pace } = *self;
        info!(path = %path.display(), "replay started");

        let mut sent = 0usize;
        for (n, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(line = n + 1, error = %e, "replay read failed, stopping");
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match parse_replay_line(trimmed) {
                Ok(frame) => {
                    if tx.send(frame).is_err() {
                        return;
                    }
                    sent += 1;
                    thread::sleep(pace);
                }
                Err(e) => {
                    let reason = format!("{:#}", e);
                    warn!(line = n + 1, error = %reason, "skipping malformed replay line");
                }
            }
        }
        info!(frames = sent, "replay finished");
    }
}
