//! Top-level frame loop.
//!
//! [`Pipeline`] owns the two role classifiers and the coordinator and turns
//! one tracker [`Frame`] into actions.  [`run`] wires a frame source, an
//! actuator and the optional preview window around it.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use gesture_control::{Actuator, ControlCoordinator};
use hand_gesture::{assign_roles, Frame, Gesture, GestureClassifier, HandRole, Handedness, LandmarkSet};

use crate::config::{PointerConfig, SourceKind};
use crate::desktop::{DryRunActuator, EnigoActuator};
use crate::levels::{brightness_control, volume_control};
use crate::source::{spawn_frame_source, ReplayFrameSource, SimFrameSource, SimInput};
use crate::visualizer::{Preview, PreviewHand, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// FrameThrottle
// ════════════════════════════════════════════════════════════════════════════

/// Drops frames that arrive closer together than `interval`.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
    interval: Duration,
    last:     Option<Instant>,
}

impl FrameThrottle {
    pub fn new(interval: Duration) -> Self {
        FrameThrottle { interval, last: None }
    }

    /// Throttle for the configured source.  Replays are paced at
    /// `replay_fps` by the source itself, so every recorded frame passes.
    pub fn for_config(cfg: &PointerConfig) -> Self {
        match cfg.source {
            SourceKind::Replay => FrameThrottle::new(Duration::ZERO),
            _                  => FrameThrottle::new(cfg.frame_interval()),
        }
    }

    /// True if a frame arriving at `now` should be processed.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pipeline
// ════════════════════════════════════════════════════════════════════════════

/// What one processed frame produced, for display and logging.
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub major: Gesture,
    pub minor: Gesture,
    pub hands: Vec<PreviewHand>,
}

pub struct Pipeline {
    dominant:    Handedness,
    major:       GestureClassifier,
    minor:       GestureClassifier,
    coordinator: ControlCoordinator,
}

impl Pipeline {
    pub fn new(cfg: &PointerConfig) -> Self {
        Pipeline {
            dominant:    cfg.dominant_hand,
            major:       GestureClassifier::with_attribution(HandRole::Major, cfg.pinch_attribution),
            minor:       GestureClassifier::with_attribution(HandRole::Minor, cfg.pinch_attribution),
            coordinator: ControlCoordinator::new(),
        }
    }

    pub fn coordinator(&self) -> &ControlCoordinator { &self.coordinator }

    /// Classify both hands and dispatch.
    ///
    /// Both classifiers advance every frame.  A hand whose landmark list is
    /// malformed is treated as absent for this frame.
    pub fn process<A: Actuator + ?Sized>(&mut self, frame: &Frame, actuator: &mut A) -> FrameReport {
        let roles = assign_roles(frame, self.dominant);
        let major_hand = valid_landmarks(roles.major, HandRole::Major);
        let minor_hand = valid_landmarks(roles.minor, HandRole::Minor);

        let major = self.major.update(major_hand.as_ref());
        let minor = self.minor.update(minor_hand.as_ref());

        self.coordinator.process_frame(
            major_hand.as_ref().map(|h| (major, h)),
            minor_hand.as_ref().map(|h| (minor, h)),
            actuator,
        );

        let mut hands = Vec::new();
        if let Some(landmarks) = major_hand {
            hands.push(PreviewHand { role: HandRole::Major, landmarks });
        }
        if let Some(landmarks) = minor_hand {
            hands.push(PreviewHand { role: HandRole::Minor, landmarks });
        }
        FrameReport { major, minor, hands }
    }
}

fn valid_landmarks(hand: Option<&hand_gesture::HandObservation>, role: HandRole) -> Option<LandmarkSet> {
    let hand = hand?;
    let set = hand.landmark_set();
    if set.is_none() {
        warn!(role = role.name(), points = hand.landmarks.len(), "malformed hand skipped");
    }
    set
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn build_actuator(cfg: &PointerConfig) -> Result<Box<dyn Actuator>> {
    if cfg.dry_run {
        info!("dry run: actions are logged, not performed");
        return Ok(Box::new(DryRunActuator::new(cfg.screen)));
    }
    let volume     = volume_control(cfg.volume_command)?;
    let brightness = brightness_control(cfg.brightness_command)?;
    Ok(Box::new(EnigoActuator::new(cfg.screen, volume, brightness)?))
}

/// Start the configured source.  The simulator also hands back the sender
/// the preview window feeds.
fn start_source(cfg: &PointerConfig) -> Result<(Receiver<Frame>, Option<mpsc::Sender<SimInput>>)> {
    match cfg.source {
        SourceKind::Sim => {
            let (sim_tx, sim_rx) = mpsc::channel();
            Ok((spawn_frame_source(SimFrameSource::new(sim_rx)), Some(sim_tx)))
        }
        SourceKind::Replay => {
            let Some(path) = cfg.replay_path.as_deref() else {
                bail!("replay source selected without a replay path");
            };
            let source = ReplayFrameSource::open(path, cfg.replay_fps)?;
            Ok((spawn_frame_source(source), None))
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => Ok((spawn_frame_source(crate::source::LeapFrameSource), None)),
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => bail!("built without LeapMotion support; rebuild with `--features leap`"),
    }
}

/// Run the controller until the window closes or the source ends.
pub fn run(cfg: PointerConfig) -> Result<()> {
    cfg.validate()?;
    if cfg.source == SourceKind::Sim && !cfg.window {
        bail!("the simulator is driven from the preview window; drop --no-window");
    }

    let mut actuator = build_actuator(&cfg)?;
    let (frames, sim_tx) = start_source(&cfg)?;
    let mut vis = if cfg.window { Some(Visualizer::new(sim_tx)?) } else { None };

    let mut pipeline = Pipeline::new(&cfg);
    let mut throttle = FrameThrottle::for_config(&cfg);
    let mut preview  = Preview::default();
    let mut processed = 0u64;
    let mut dropped   = 0u64;

    info!(source = ?cfg.source, fps = cfg.max_fps, dominant = ?cfg.dominant_hand, "running");

    'outer: loop {
        // 1. Window input (feeds the simulator)
        if let Some(v) = vis.as_mut() {
            if !v.is_open() || !v.poll_input() {
                break;
            }
        }

        // 2. Frames: drain while a window is up, block otherwise
        let mut batch = Vec::new();
        if vis.is_some() {
            loop {
                match frames.try_recv() {
                    Ok(f) => batch.push(f),
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => {
                        info!("frame source finished");
                        break 'outer;
                    }
                }
            }
        } else {
            match frames.recv() {
                Ok(f) => batch.push(f),
                Err(_) => {
                    info!("frame source finished");
                    break;
                }
            }
        }

        // 3. Classify and act
        for frame in batch {
            if !throttle.admit(Instant::now()) {
                dropped += 1;
                continue;
            }
            let report = pipeline.process(&frame, actuator.as_mut());
            processed += 1;
            preview.major = report.major;
            preview.minor = report.minor;
            preview.hands = report.hands;
        }

        // 4. Render
        if let Some(v) = vis.as_mut() {
            let c = pipeline.coordinator();
            preview.flags       = c.flags();
            preview.last_action = c.last_action();
            preview.status      = format!("frames {}  dropped {}", processed, dropped);
            v.render(&preview);
        }
    }

    debug!(processed, dropped, "stopped");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_control::{Action, RecordingActuator, ScrollAxis};
    use hand_gesture::{HandObservation, HandPose, Landmark, PinchAttribution};

    fn frame(hands: &[(Handedness, HandPose, f32, f32)]) -> Frame {
        Frame {
            hands: hands
                .iter()
                .map(|&(side, pose, x, y)| HandObservation::new(side, &pose.landmarks(x, y)))
                .collect(),
        }
    }

    fn feed(p: &mut Pipeline, a: &mut RecordingActuator, f: &Frame, n: usize) -> FrameReport {
        let mut report = FrameReport::default();
        for _ in 0..n {
            report = p.process(f, a);
        }
        report
    }

    #[test]
    fn throttle_drops_fast_frames() {
        let mut t = FrameThrottle::new(Duration::from_millis(66));
        let t0 = Instant::now();
        assert!(t.admit(t0));
        assert!(!t.admit(t0 + Duration::from_millis(30)));
        assert!(!t.admit(t0 + Duration::from_millis(65)));
        assert!(t.admit(t0 + Duration::from_millis(70)));
        assert!(!t.admit(t0 + Duration::from_millis(100)));
        assert!(t.admit(t0 + Duration::from_millis(140)));
    }

    #[test]
    fn replayed_frames_all_reach_the_pipeline() {
        use std::io::Write;

        use crate::source::FrameSource;

        let fist = frame(&[(Handedness::Right, HandPose::Fist, 0.5, 0.5)]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for _ in 0..6 {
            writeln!(file, "{}", serde_json::to_string(&fist).unwrap()).unwrap();
        }

        let cfg = PointerConfig {
            source:     SourceKind::Replay,
            replay_fps: 30,
            ..PointerConfig::default()
        };
        assert!(cfg.replay_fps > cfg.max_fps);
        let mut throttle = FrameThrottle::for_config(&cfg);
        let mut p = Pipeline::new(&cfg);
        let mut a = RecordingActuator::new(1920, 1080);

        let source = ReplayFrameSource::open(file.path(), cfg.replay_fps).unwrap();
        let (tx, rx) = mpsc::channel();
        Box::new(source).run(tx);

        let mut processed = 0;
        for f in rx.try_iter() {
            assert!(throttle.admit(Instant::now()));
            p.process(&f, &mut a);
            processed += 1;
        }
        assert_eq!(processed, 6);
        assert_eq!(a.count(&Action::PressPrimary), 1);
    }

    #[test]
    fn live_sources_keep_the_fps_cap() {
        let cfg = PointerConfig::default();
        let mut t = FrameThrottle::for_config(&cfg);
        let t0 = Instant::now();
        assert!(t.admit(t0));
        assert!(!t.admit(t0 + Duration::from_millis(33)));
    }

    #[test]
    fn held_fist_presses_after_debounce() {
        let mut p = Pipeline::new(&PointerConfig::default());
        let mut a = RecordingActuator::new(1920, 1080);
        let fist = frame(&[(Handedness::Right, HandPose::Fist, 0.5, 0.5)]);

        let report = feed(&mut p, &mut a, &fist, 5);
        assert_eq!(report.major, Gesture::Palm);
        assert!(a.actions.is_empty());

        let report = p.process(&fist, &mut a);
        assert_eq!(report.major, Gesture::Fist);
        assert_eq!(a.count(&Action::PressPrimary), 1);

        feed(&mut p, &mut a, &Frame::empty(), 1);
        assert_eq!(a.count(&Action::ReleasePrimary), 1);
    }

    #[test]
    fn left_handed_users_drive_with_the_left_hand() {
        let cfg = PointerConfig { dominant_hand: Handedness::Left, ..PointerConfig::default() };
        let mut p = Pipeline::new(&cfg);
        let mut a = RecordingActuator::new(1920, 1080);
        let f = frame(&[
            (Handedness::Right, HandPose::Open, 0.7, 0.5),
            (Handedness::Left,  HandPose::Fist, 0.3, 0.5),
        ]);
        let report = feed(&mut p, &mut a, &f, 6);
        assert_eq!(report.major, Gesture::Fist);
        assert_eq!(report.minor, Gesture::Last4);
        assert!(p.coordinator().flags().drag);
        assert_eq!(report.hands.len(), 2);
        assert_eq!(report.hands[0].role, HandRole::Major);
    }

    #[test]
    fn role_specific_minor_pinch_scrolls() {
        let cfg = PointerConfig {
            pinch_attribution: PinchAttribution::RoleSpecific,
            ..PointerConfig::default()
        };
        let mut p = Pipeline::new(&cfg);
        let mut a = RecordingActuator::new(1920, 1080);

        let start = frame(&[
            (Handedness::Right, HandPose::Open,  0.7, 0.5),
            (Handedness::Left,  HandPose::Pinch, 0.3, 0.5),
        ]);
        let report = feed(&mut p, &mut a, &start, 6);
        assert_eq!(report.minor, Gesture::PinchMinor);
        assert!(p.coordinator().flags().pinch_minor);

        let down = frame(&[
            (Handedness::Right, HandPose::Open,  0.7, 0.5),
            (Handedness::Left,  HandPose::Pinch, 0.3, 0.56),
        ]);
        feed(&mut p, &mut a, &down, 7);
        let scrolls: Vec<_> = a.actions.iter().filter(|x| matches!(x, Action::Scroll { .. })).collect();
        assert_eq!(scrolls, vec![&Action::Scroll { axis: ScrollAxis::Vertical, amount: -120 }]);
    }

    #[test]
    fn role_agnostic_minor_pinch_is_ignored() {
        let mut p = Pipeline::new(&PointerConfig::default());
        let mut a = RecordingActuator::new(1920, 1080);
        let f = frame(&[
            (Handedness::Right, HandPose::Open,  0.7, 0.5),
            (Handedness::Left,  HandPose::Pinch, 0.3, 0.5),
        ]);
        let report = feed(&mut p, &mut a, &f, 8);
        assert_eq!(report.minor, Gesture::PinchMajor);
        assert!(!p.coordinator().flags().pinch_minor);
        assert!(!p.coordinator().flags().pinch_major);
        assert!(a.actions.is_empty());
    }

    #[test]
    fn malformed_hand_is_treated_as_absent() {
        let mut p = Pipeline::new(&PointerConfig::default());
        let mut a = RecordingActuator::new(1920, 1080);
        let broken = Frame {
            hands: vec![HandObservation {
                handedness: Handedness::Right,
                landmarks:  vec![Landmark::new(0.5, 0.5, 0.0); 7],
            }],
        };
        let report = p.process(&broken, &mut a);
        assert_eq!(report.major, Gesture::Palm);
        assert!(report.hands.is_empty());
        assert!(a.actions.is_empty());
    }
}
