//! Configuration management for tether

mod agent;
pub mod serde_utils;
mod session;

pub use agent::AgentConfig;
pub use session::SessionConfig;

use crate::error::ConfigError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tether")
}

/// Get the default agent configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("agent.toml")
}

/// Load configuration from a TOML file
///
/// A missing file is reported as [`ConfigError::NotFound`] so callers can
/// fall back to defaults.
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::Invalid(format!(
                "Can't read {}: {}",
                path.display(),
                e
            )))
        }
    };
    Ok(toml::from_str(&content)?)
}

/// Save configuration as TOML
///
/// The file holds the auth token: it is written owner-only and swapped into
/// place with a rename, so readers never observe a partial file.
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    let io_err = |what: &str, e: io::Error| ConfigError::Invalid(format!("Can't {}: {}", what, e));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_err("create config dir", e))?;
    }

    let staging = path.with_extension("toml.partial");
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let written = options
        .open(&staging)
        .and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&staging, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&staging);
        return Err(io_err("write config", e));
    }
    Ok(())
}
