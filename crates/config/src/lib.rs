pub mod schema;
pub mod watcher;

pub use schema::{MonitorConfig, OutputConfig, OutputFormat, SamplingConfig};
pub use watcher::ConfigWatcher;

use eco_core::{MonitorError, Result};
use std::path::{Path, PathBuf};

/// Read `ecomon.toml` at `path`.
///
/// A missing file is not an error: a warning is logged and the built-in
/// sampling settings (2 s interval, top 10, 30-sample history, disk `/`) are
/// used. A file that exists but cannot be read or parsed is
/// [`MonitorError::Config`].
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))
}

/// `$XDG_CONFIG_HOME/ecomon/ecomon.toml`, or `$HOME/.config/ecomon/ecomon.toml`
/// when the variable is unset. With neither variable the path is relative to
/// the working directory.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("ecomon").join("ecomon.toml")
}
