//! Runtime configuration, read from TOML.
//!
//! Every field has a default, so a missing or empty file is a valid
//! configuration.  Command-line flags are applied on top by the binary.
//!
//! ```toml
//! dominant_hand      = "right"
//! pinch_attribution  = "role-agnostic"
//! max_fps            = 15
//! source             = "leap"
//! volume_command     = "pactl"
//! brightness_command = "none"
//!
//! [screen]
//! width  = 2560
//! height = 1440
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

use hand_gesture::{Handedness, PinchAttribution};

/// Filter used when neither `RUST_LOG` nor `log_filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "leap_pointer=info,gesture_control=info,hand_gesture=info";

/// Where frames come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Keyboard-driven synthetic hands in the preview window.
    #[default]
    Sim,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
    /// A recorded JSON-lines session.
    Replay,
}

/// Which system tool carries out a level adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelBackend {
    Pactl,
    Brightnessctl,
    /// Adjustments are reported as failures and otherwise ignored.
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ScreenSize {
    pub width:  u32,
    pub height: u32,
}

// ════════════════════════════════════════════════════════════════════════════
// PointerConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// This hand becomes the major (cursor) hand.
    pub dominant_hand:      Handedness,
    pub pinch_attribution:  PinchAttribution,
    /// Frames arriving faster than this are dropped.
    pub max_fps:            u32,
    /// Overrides the detected display size.
    pub screen:             Option<ScreenSize>,
    pub source:             SourceKind,
    pub replay_path:        Option<PathBuf>,
    pub replay_fps:         u32,
    pub volume_command:     LevelBackend,
    pub brightness_command: LevelBackend,
    pub log_filter:         Option<String>,
    /// Log actions instead of performing them.
    pub dry_run:            bool,
    /// Open the preview window.  Always on for the simulator.
    pub window:             bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig {
            dominant_hand:      Handedness::Right,
            pinch_attribution:  PinchAttribution::RoleAgnostic,
            max_fps:            15,
            screen:             None,
            source:             SourceKind::Sim,
            replay_path:        None,
            replay_fps:         30,
            volume_command:     LevelBackend::Pactl,
            brightness_command: LevelBackend::Brightnessctl,
            log_filter:         None,
            dry_run:            false,
            window:             true,
        }
    }
}

impl PointerConfig {
    /// Parse a TOML document.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let cfg = toml::from_str::<PointerConfig>(raw).context("invalid TOML configuration")?;
        Ok(cfg)
    }

    /// Read `path`; a file that does not exist yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no configuration file, using defaults");
            return Ok(PointerConfig::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Reject combinations the run loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_fps == 0 {
            bail!("max_fps must be at least 1");
        }
        if self.replay_fps == 0 {
            bail!("replay_fps must be at least 1");
        }
        if self.source == SourceKind::Replay && self.replay_path.is_none() {
            bail!("source = \"replay\" needs replay_path");
        }
        if let Some(ScreenSize { width, height }) = self.screen {
            if width == 0 || height == 0 {
                bail!("screen size must be non-zero, got {}x{}", width, height);
            }
        }
        Ok(())
    }

    /// Minimum spacing between processed frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.max_fps.max(1) as f64)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = PointerConfig::from_toml("").unwrap();
        assert_eq!(cfg, PointerConfig::default());
        assert_eq!(cfg.max_fps, 15);
        assert_eq!(cfg.dominant_hand, Handedness::Right);
        assert_eq!(cfg.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn parses_every_field() {
        let cfg = PointerConfig::from_toml(
            r#"
            dominant_hand      = "left"
            pinch_attribution  = "role-specific"
            max_fps            = 30
            source             = "replay"
            replay_path        = "session.jsonl"
            replay_fps         = 60
            volume_command     = "none"
            brightness_command = "none"
            log_filter         = "leap_pointer=debug"
            dry_run            = true
            window             = false

            [screen]
            width  = 2560
            height = 1440
            "#,
        )
        .unwrap();
        assert_eq!(cfg.dominant_hand, Handedness::Left);
        assert_eq!(cfg.pinch_attribution, PinchAttribution::RoleSpecific);
        assert_eq!(cfg.source, SourceKind::Replay);
        assert_eq!(cfg.replay_path.as_deref(), Some(Path::new("session.jsonl")));
        assert_eq!(cfg.volume_command, LevelBackend::None);
        assert_eq!(cfg.screen, Some(ScreenSize { width: 2560, height: 1440 }));
        assert_eq!(cfg.log_filter(), "leap_pointer=debug");
        assert!(cfg.dry_run);
        assert!(!cfg.window);
        cfg.validate().unwrap();
    }

    #[test]
    fn unknown_source_is_an_error() {
        let err = PointerConfig::from_toml("source = \"webcam\"").unwrap_err();
        assert!(format!("{:#}", err).contains("invalid TOML"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_fps = 20").unwrap();
        writeln!(file, "dry_run = true").unwrap();
        let cfg = PointerConfig::load(file.path()).unwrap();
        assert_eq!(cfg.max_fps, 20);
        assert!(cfg.dry_run);
        assert_eq!(cfg.source, SourceKind::Sim);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PointerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, PointerConfig::default());
    }

    #[test]
    fn load_names_the_broken_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_fps = \"fast\"").unwrap();
        let err = PointerConfig::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains(&file.path().display().to_string()));
    }

    #[test]
    fn validation() {
        let mut cfg = PointerConfig { max_fps: 0, ..PointerConfig::default() };
        assert!(cfg.validate().is_err());
        cfg.max_fps = 15;
        cfg.source = SourceKind::Replay;
        assert!(cfg.validate().is_err());
        cfg.replay_path = Some(PathBuf::from("x.jsonl"));
        assert!(cfg.validate().is_ok());
        cfg.screen = Some(ScreenSize { width: 0, height: 10 });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn frame_interval_from_fps() {
        let cfg = PointerConfig::default();
        let ms = cfg.frame_interval().as_secs_f64() * 1000.0;
        assert!((ms - 66.666).abs() < 0.01);
    }
}
