//! Tool configuration (`~/.buildconfig`) and the `build.json` manifest.
pub mod manifest;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::logging::Log;

/// Configuration file read when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "~/.buildconfig";

/// Root used when the configuration file cannot be used.
pub const DEFAULT_ROOT: &str = "~/Developer/src";

/// Resolved tool configuration.
///
/// `root` is always absolute once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Base directory for `//`-prefixed dependency paths.
    pub root: PathBuf,
}

/// On-disk shape; every field here is required.
#[derive(Debug, Deserialize)]
struct RawConfig {
    root: String,
}

impl Configuration {
    /// Load the configuration from `source` (default [`DEFAULT_CONFIG_PATH`]).
    ///
    /// Never fails: an unreadable file, malformed JSON, a missing `root` or
    /// a root that does not resolve to an absolute path produces a warning
    /// and the default configuration.
    pub fn load(source: Option<&Path>, home: &Path, log: &dyn Log) -> Self {
        let source = source.map_or_else(
            || expand_tilde(DEFAULT_CONFIG_PATH, home),
            Path::to_path_buf,
        );
        match Self::try_load(&source, home) {
            Ok(config) => {
                log.debug(&format!("root: {}", config.root.display()));
                config
            }
            Err(e) => {
                log.warn(&format!(
                    "WARNING! {} not parsed. Using defaults.",
                    source.display()
                ));
                log.debug(&format!("{e}"));
                Self::default_for(home)
            }
        }
    }

    /// Read and validate `source` without falling back.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, is not a JSON
    /// object with a string `root`, or `root` is relative.
    pub fn try_load(source: &Path, home: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(source).map_err(|e| ConfigError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;
        let raw: RawConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?;
        let root = expand_tilde(&raw.root, home);
        if !root.is_absolute() {
            return Err(ConfigError::RelativeRoot(raw.root));
        }
        Ok(Self { root })
    }

    /// The built-in configuration, with `~` expanded against `home`.
    #[must_use]
    pub fn default_for(home: &Path) -> Self {
        Self {
            root: expand_tilde(DEFAULT_ROOT, home),
        }
    }
}

/// Replace a leading `~` in `path` with `home`.
///
/// `~user` forms are not supported; anything after the tilde is joined to
/// `home` as-is.
#[must_use]
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    path.strip_prefix('~').map_or_else(
        || PathBuf::from(path),
        |rest| home.join(rest.trim_start_matches(['/', '\\'])),
    )
}

/// The current user's home directory from `HOME` (or `USERPROFILE`).
///
/// # Errors
///
/// Returns an error if neither variable is set.
pub fn home_dir() -> anyhow::Result<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::test_helpers::write_temp_file;
    use super::*;
    use crate::logging::Logger;

    fn home() -> PathBuf {
        PathBuf::from("/home/u")
    }

    #[test]
    fn expand_tilde_replaces_prefix() {
        assert_eq!(
            expand_tilde("~/Developer/src", &home()),
            PathBuf::from("/home/u/Developer/src")
        );
        assert_eq!(expand_tilde("~", &home()), home());
    }

    #[test]
    fn expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde("/opt/src", &home()), PathBuf::from("/opt/src"));
        assert_eq!(expand_tilde("src/~x", &home()), PathBuf::from("src/~x"));
    }

    #[test]
    fn loads_absolute_root() {
        let (_dir, path) = write_temp_file(".buildconfig", r#"{"root": "/srv/src"}"#);
        let config = Configuration::load(Some(&path), &home(), &Logger::with_log_file(None));
        assert_eq!(config.root, PathBuf::from("/srv/src"));
    }

    #[test]
    fn expands_tilde_root() {
        let (_dir, path) = write_temp_file(".buildconfig", r#"{"root": "~/code"}"#);
        let config = Configuration::load(Some(&path), &home(), &Logger::with_log_file(None));
        assert_eq!(config.root, PathBuf::from("/home/u/code"));
        assert!(config.root.is_absolute());
    }

    #[test]
    fn ignores_extra_properties() {
        let (_dir, path) =
            write_temp_file(".buildconfig", r#"{"root": "/srv/src", "editor": "vim"}"#);
        let config = Configuration::load(Some(&path), &home(), &Logger::with_log_file(None));
        assert_eq!(config.root, PathBuf::from("/srv/src"));
    }

    #[test]
    fn missing_root_falls_back_to_default() {
        let (_dir, path) = write_temp_file(".buildconfig", r#"{"base": "/srv"}"#);
        let config = Configuration::load(Some(&path), &home(), &Logger::with_log_file(None));
        assert_eq!(config, Configuration::default_for(&home()));
        assert_eq!(config.root, PathBuf::from("/home/u/Developer/src"));
    }

    #[test]
    fn invalid_json_falls_back_to_default() {
        let (_dir, path) = write_temp_file(".buildconfig", "{root: nope");
        let config = Configuration::load(Some(&path), &home(), &Logger::with_log_file(None));
        assert_eq!(config, Configuration::default_for(&home()));
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::load(
            Some(&dir.path().join("absent")),
            &home(),
            &Logger::with_log_file(None),
        );
        assert_eq!(config, Configuration::default_for(&home()));
    }

    #[test]
    fn relative_root_is_rejected() {
        let (_dir, path) = write_temp_file(".buildconfig", r#"{"root": "src"}"#);
        assert!(matches!(
            Configuration::try_load(&path, &home()),
            Err(ConfigError::RelativeRoot(_))
        ));
        let config = Configuration::load(Some(&path), &home(), &Logger::with_log_file(None));
        assert_eq!(config, Configuration::default_for(&home()));
    }

    #[test]
    fn non_string_root_is_a_parse_error() {
        let (_dir, path) = write_temp_file(".buildconfig", r#"{"root": 42}"#);
        assert!(matches!(
            Configuration::try_load(&path, &home()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn default_path_resolves_under_home() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".buildconfig"), r#"{"root": "~/work"}"#).unwrap();
        let config = Configuration::load(None, home.path(), &Logger::with_log_file(None));
        assert_eq!(config.root, home.path().join("work"));
    }
}
