use anyhow::{Context, Result};
use std::{fs, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

/// Logs go to a file; the terminal belongs to the UI. RUST_LOG sets the
/// level, default `info`.
pub(crate) fn init(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // only succeeds if no global subscriber is set yet
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
