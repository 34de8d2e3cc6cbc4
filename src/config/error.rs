use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to determine configuration directory")]
    MissingConfigDir,
    #[error("Config file '{0}' not found")]
    NotFound(PathBuf),
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file '{path}': {source}")]
    Deserialize {
        path: PathBuf,
        source: toml::de::Error,
    },
}
