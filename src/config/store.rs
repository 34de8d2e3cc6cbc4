use super::Config;
use super::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::{fs, io, path::Path, path::PathBuf};

const CONFIG_FILE: &str = "config.toml";

fn default_path() -> ConfigResult<PathBuf> {
    ProjectDirs::from("com", "ea-cli", "ea-cli")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .ok_or(ConfigError::MissingConfigDir)
}

fn parse(path: &Path, contents: &str) -> ConfigResult<Config> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }

    toml::from_str(contents).map_err(|source| ConfigError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the config file. An explicit path must exist; the default location
/// falls back to built-in defaults when absent.
pub fn load(explicit: Option<&Path>) -> ConfigResult<Config> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (default_path()?, false),
    };

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            if required {
                return Err(ConfigError::NotFound(path));
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    tracing::debug!(path = %path.display(), "loaded config file");
    parse(&path, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tenant = \"contoso.onmicrosoft.com\"").unwrap();
        writeln!(file, "output = \"table\"").unwrap();
        writeln!(file, "timeout_secs = 10").unwrap();

        let config = load(Some(file.path())).unwrap();

        assert_eq!(config.tenant.as_deref(), Some("contoso.onmicrosoft.com"));
        assert_eq!(config.output, OutputFormat::Table);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.endpoint, "https://management.azure.com");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(load(Some(file.path())).unwrap(), Config::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tennant = \"typo\"").unwrap();

        let err = load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize { .. }));
    }
}
