use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "satsim")]
#[command(about = "Simulated satellite tracker for the terminal")]
pub(crate) struct Cli {
    /// Frame rate cap (10-240)
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    pub(crate) mono: bool,

    /// Seed for the velocity random source
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Catalog id to select on startup
    #[arg(long)]
    pub(crate) select: Option<u32>,

    /// Telemetry regeneration period (milliseconds)
    #[arg(long)]
    pub(crate) regen_ms: Option<u64>,

    /// Settings file (default: <data dir>/settings.json)
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,

    /// Log file (default: <data dir>/satsim.log)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) regen_period_ms: u64,
    pub(crate) clock_period_ms: u64,
    pub(crate) panel_width: u16,
    pub(crate) seed: Option<u64>,
    pub(crate) initial_selection: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            enable_color: true,
            regen_period_ms: 5_000,
            clock_period_ms: 1_000,
            panel_width: 36,
            seed: None,
            initial_selection: None,
        }
    }
}

impl Settings {
    pub(crate) fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(fps) = cli.fps {
            self.fps_cap = fps;
        }
        if cli.mono {
            self.enable_color = false;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.select.is_some() {
            self.initial_selection = cli.select;
        }
        if let Some(ms) = cli.regen_ms {
            self.regen_period_ms = ms;
        }
        self
    }

    pub(crate) fn fps(&self) -> u32 {
        self.fps_cap.clamp(10, 240)
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "satsim", "Satsim")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("satsim.log"),
    })
}

/// Missing file means defaults; a malformed one is logged and ignored.
pub(crate) fn load_settings(path: &Path) -> Settings {
    let Ok(s) = fs::read_to_string(path) else {
        return Settings::default();
    };
    match serde_json::from_str::<Settings>(&s) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
            Settings::default()
        }
    }
}
