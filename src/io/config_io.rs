use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for configuration and data directory lookup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("no data directory available; pass one with -C")]
    NoDataDir,
}

pub const CONFIG_FILE: &str = "config.toml";

/// The data directory: an explicit override, or `<platform data dir>/grain`
pub fn resolve_data_dir(override_dir: Option<&str>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => dirs::data_dir()
            .map(|d| d.join("grain"))
            .ok_or(ConfigError::NoDataDir),
    }
}

/// Read `<data_dir>/config.toml`. A missing file yields the defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}
