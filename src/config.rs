use crate::error::{GridError, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Runtime options. The visual parameters always start from their defaults.
#[derive(Parser, Debug, Clone)]
#[command(name = "gradient-grid", version)]
#[command(about = "Animated gradient grid around a frosted glass panel", long_about = None)]
pub struct Args {
    /// Frame cap for terminal output
    #[arg(long, default_value_t = 60)]
    pub fps: u64,

    /// Animation tick period in milliseconds
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub tick_ms: u64,

    /// Seed for the angle generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with the control panel hidden (toggle with `h`)
    #[arg(long, default_value_t = false)]
    pub hide_panel: bool,

    /// Write diagnostics to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        let fps = self.fps.clamp(10, 240);
        Duration::from_micros(1_000_000 / fps)
    }
}

/// Sends `tracing` output to the log file, if one was requested. Without a
/// file nothing is installed since the terminal belongs to the visual.
pub fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| GridError::Logging(e.to_string()))
}
