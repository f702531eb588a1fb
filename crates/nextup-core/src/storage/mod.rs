mod config;

pub use config::{AudioConfig, ClockConfig, Config, LogConfig, ScheduleConfig, SourceConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/nextup[-dev]/` based on NEXTUP_ENV.
///
/// Set NEXTUP_ENV=dev to use the development directory. NEXTUP_HOME
/// replaces `~/.config` as the base.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = match std::env::var_os("NEXTUP_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config"),
    };

    let env = std::env::var("NEXTUP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("nextup-dev")
    } else {
        base_dir.join("nextup")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
