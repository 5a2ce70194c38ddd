//! User configuration loading for kirinuki.
//!
//! User config location: $XDG_CONFIG_HOME/kirinuki/kirinuki.toml
//! Fallback: the platform config directory (via `dirs`), e.g. ~/.config/kirinuki/kirinuki.toml

use super::settings::SummarizeConfig;
use crate::error::KirinukiResult;
use std::fs;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "kirinuki.toml";

/// Returns the path to the user configuration file.
///
/// Returns None if neither $XDG_CONFIG_HOME nor a platform config directory is available.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join("kirinuki").join(CONFIG_FILE_NAME))
}

/// Load the user config; `Ok(None)` when there is no file
pub fn load_user_config() -> KirinukiResult<Option<SummarizeConfig>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&contents)?))
}
