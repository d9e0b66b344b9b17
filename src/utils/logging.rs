//! Diagnostic logging for `--debug-log`.
//!
//! The terminal belongs to the chat UI, so tracing output only ever goes to a
//! file. Without a path no subscriber is installed and every event is dropped.

use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "parley=debug";

pub fn init_tracing(log_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_path else {
        return Ok(());
    };

    let file = open_log_file(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| format!("Could not install debug logger: {err}"))?;

    tracing::debug!(path = %path.display(), "Debug logging enabled");
    Ok(())
}

/// Open `path` for appending, creating it and any missing parent directories.
fn open_log_file(path: &Path) -> Result<File, Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("Cannot write debug log {}: {err}", path.display()))?;
    Ok(file)
}
