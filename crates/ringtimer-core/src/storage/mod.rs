mod config;

pub use config::{Config, CuesConfig, EngineConfig, PickerConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/ringtimer[-dev]/` based on RINGTIMER_ENV.
///
/// Set RINGTIMER_ENV=dev to use a development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RINGTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ringtimer-dev")
    } else {
        base_dir.join("ringtimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
