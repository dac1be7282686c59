//! Where keytrap looks for its config and log files
//!
//! `$XDG_CONFIG_HOME/keytrap/` when set, otherwise `~/.config/keytrap/`.

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "keytrap";

/// Base config directory for keytrap
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(env::var_os("XDG_CONFIG_HOME"), default_config_base())
}

#[cfg(not(target_os = "windows"))]
fn default_config_base() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config"))
}

#[cfg(target_os = "windows")]
fn default_config_base() -> Option<PathBuf> {
    dirs::config_dir()
}

/// An empty `XDG_CONFIG_HOME` counts as unset
fn resolve_config_dir(xdg: Option<OsString>, fallback: Option<PathBuf>) -> Option<PathBuf> {
    xdg.filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(fallback)
        .map(|base| base.join(APP_DIR))
}

/// `~/.config/keytrap/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/keytrap/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create a directory (and parents) if missing
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Create the logs directory and return its path
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory available")
    })?;
    ensure_dir(&dir)?;
    Ok(dir)
}
