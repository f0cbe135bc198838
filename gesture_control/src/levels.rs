//! System level controls (volume, brightness) as a `[0, 1]` scalar.

use anyhow::{Context, Result};

/// A readable and writable system level.
pub trait LevelControl {
    fn name(&self) -> &str;

    /// Current level, `0.0..=1.0`.
    fn level(&mut self) -> Result<f32>;

    fn set_level(&mut self, level: f32) -> Result<()>;
}

/// Add `delta` to the current level, clamped to `[0, 1]`.  Returns the
/// level written.
pub fn nudge_level(control: &mut dyn LevelControl, delta: f32) -> Result<f32> {
    let current = control
        .level()
        .with_context(|| format!("reading {} level", control.name()))?;
    let next = (current + delta).clamp(0.0, 1.0);
    control
        .set_level(next)
        .with_context(|| format!("setting {} level to {:.2}", control.name(), next))?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Fixed(f32);

    impl LevelControl for Fixed {
        fn name(&self) -> &str { "fixed" }
        fn level(&mut self) -> Result<f32> { Ok(self.0) }
        fn set_level(&mut self, level: f32) -> Result<()> {
            self.0 = level;
            Ok(())
        }
    }

    struct Broken;

    impl LevelControl for Broken {
        fn name(&self) -> &str { "broken" }
        fn level(&mut self) -> Result<f32> { bail!("no backend") }
        fn set_level(&mut self, _level: f32) -> Result<()> { bail!("no backend") }
    }

    #[test]
    fn nudge_adds_delta() {
        let mut c = Fixed(0.5);
        let v = nudge_level(&mut c, 0.01).unwrap();
        assert!((v - 0.51).abs() < 1e-6);
        assert!((c.0 - 0.51).abs() < 1e-6);
    }

    #[test]
    fn nudge_clamps_both_ends() {
        let mut c = Fixed(0.99);
        assert_eq!(nudge_level(&mut c, 0.2).unwrap(), 1.0);
        let mut c = Fixed(0.01);
        assert_eq!(nudge_level(&mut c, -0.2).unwrap(), 0.0);
    }

    #[test]
    fn failure_carries_context() {
        let err = nudge_level(&mut Broken, 0.1).unwrap_err();
        assert!(format!("{:#}", err).contains("reading broken level"));
    }
}
