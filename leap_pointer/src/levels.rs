//! Volume and brightness through the usual Linux command-line tools.
//!
//! | Level | Backend | Read | Write |
//! |---|---|---|---|
//! | volume | `pactl` | `get-sink-volume @DEFAULT_SINK@` | `set-sink-volume @DEFAULT_SINK@ N%` |
//! | brightness | `brightnessctl` | `-m` (machine-readable) | `-q set N%` |

use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};

use gesture_control::LevelControl;

use crate::config::LevelBackend;

/// Run a tool and return its stdout.
fn run_tool(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to execute {}", program))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("{} failed with status {}: {}", program, output.status, stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn percent(level: f32) -> String {
    format!("{}%", (level.clamp(0.0, 1.0) * 100.0).round() as u32)
}

/// First `NN%` token in `text`, as a fraction.
fn first_percentage(text: &str) -> Option<f32> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '/')
        .filter_map(|tok| tok.strip_suffix('%'))
        .find_map(|n| n.parse::<f32>().ok())
        .map(|p| p / 100.0)
}

// ── pactl ─────────────────────────────────────────────────────────────────

/// Default PulseAudio / PipeWire sink volume.
#[derive(Clone, Debug, Default)]
pub struct PactlVolume;

/// `Volume: front-left: 32768 /  50% / -18.06 dB,   front-right: ...`
pub fn parse_pactl_volume(text: &str) -> Result<f32> {
    first_percentage(text).ok_or_else(|| anyhow!("no percentage in pactl output {:?}", text.trim()))
}

impl LevelControl for PactlVolume {
    fn name(&self) -> &str { "volume" }

    fn level(&mut self) -> Result<f32> {
        let out = run_tool("pactl", &["get-sink-volume", "@DEFAULT_SINK@"])?;
        parse_pactl_volume(&out)
    }

    fn set_level(&mut self, level: f32) -> Result<()> {
        run_tool("pactl", &["set-sink-volume", "@DEFAULT_SINK@", &percent(level)])?;
        Ok(())
    }
}

// ── brightnessctl ─────────────────────────────────────────────────────────

/// Backlight brightness.
#[derive(Clone, Debug, Default)]
pub struct BrightnessctlBrightness;

/// `intel_backlight,backlight,400,40%,1000`
pub fn parse_brightnessctl(text: &str) -> Result<f32> {
    let line = text.lines().next().unwrap_or_default();
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() < 5 {
        bail!("unexpected brightnessctl output {:?}", line);
    }
    let current: f32 = fields[2].parse().context("brightnessctl current value")?;
    let max: f32 = fields[4].parse().context("brightnessctl max value")?;
    if max <= 0.0 {
        bail!("brightnessctl reports max brightness {}", max);
    }
    Ok((current / max).clamp(0.0, 1.0))
}

impl LevelControl for BrightnessctlBrightness {
    fn name(&self) -> &str { "brightness" }

    fn level(&mut self) -> Result<f32> {
        let out = run_tool("brightnessctl", &["-m"])?;
        parse_brightnessctl(&out)
    }

    fn set_level(&mut self, level: f32) -> Result<()> {
        run_tool("brightnessctl", &["-q", "set", &percent(level)])?;
        Ok(())
    }
}

// ── unavailable ───────────────────────────────────────────────────────────

/// A level with no backend; every call fails.
#[derive(Clone, Debug)]
pub struct Unavailable {
    name: &'static str,
}

impl Unavailable {
    pub fn new(name: &'static str) -> Self {
        Unavailable { name }
    }
}

impl LevelControl for Unavailable {
    fn name(&self) -> &str { self.name }

    fn level(&mut self) -> Result<f32> {
        bail!("no {} backend configured", self.name)
    }

    fn set_level(&mut self, _level: f32) -> Result<()> {
        bail!("no {} backend configured", self.name)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Construction from configuration
// ════════════════════════════════════════════════════════════════════════════

pub fn volume_control(backend: LevelBackend) -> Result<Box<dyn LevelControl>> {
    match backend {
        LevelBackend::Pactl => Ok(Box::new(PactlVolume)),
        LevelBackend::None  => Ok(Box::new(Unavailable::new("volume"))),
        other => bail!("{:?} cannot control volume", other),
    }
}

pub fn brightness_control(backend: LevelBackend) -> Result<Box<dyn LevelControl>> {
    match backend {
        LevelBackend::Brightnessctl => Ok(Box::new(BrightnessctlBrightness)),
        LevelBackend::None          => Ok(Box::new(Unavailable::new("brightness"))),
        other => bail!("{:?} cannot control brightness", other),
    }
}
