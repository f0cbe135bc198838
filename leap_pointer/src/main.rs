//! leap_pointer: command-line entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use hand_gesture::Handedness;
use leap_pointer::app::run;
use leap_pointer::config::{PointerConfig, SourceKind};

#[derive(Parser, Debug)]
#[command(name = "leap_pointer", about = "Drive the desktop pointer with hand gestures")]
struct Cli {
    /// TOML configuration file
    #[arg(long, default_value = "leap_pointer.toml")]
    config: PathBuf,

    /// Frame source
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Replay a recorded JSON-lines session (implies --source replay)
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Use the left hand as the cursor hand
    #[arg(long)]
    left_handed: bool,

    /// Log actions instead of performing them
    #[arg(long)]
    dry_run: bool,

    /// Run without the preview window
    #[arg(long)]
    no_window: bool,

    /// Maximum processed frames per second
    #[arg(long)]
    fps: Option<u32>,
}

impl Cli {
    fn apply(self, cfg: &mut PointerConfig) {
        if let Some(path) = self.replay {
            cfg.source = SourceKind::Replay;
            cfg.replay_path = Some(path);
        }
        if let Some(source) = self.source {
            cfg.source = source;
        }
        if self.left_handed {
            cfg.dominant_hand = Handedness::Left;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.no_window {
            cfg.window = false;
        }
        if let Some(fps) = self.fps {
            cfg.max_fps = fps;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = PointerConfig::load(&cli.config)?;
    cli.apply(&mut cfg);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.log_filter().into()),
        )
        .init();

    info!("leap_pointer v{} starting", env!("CARGO_PKG_VERSION"));
    #[cfg(feature = "leap")]
    info!("LeapMotion support enabled");

    run(cfg)
}
