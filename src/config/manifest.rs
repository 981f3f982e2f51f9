//! `build.json` loading and per-target decoding.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DependencyError, ManifestError};

/// File name of the manifest looked up in each manifest directory.
pub const MANIFEST_FILE: &str = "build.json";

/// A loaded manifest: target name to its raw JSON definition.
///
/// Targets are decoded lazily with [`Manifest::target`] so that a malformed
/// target only fails its own build.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Directory containing `build.json`; relative paths resolve against it.
    pub dir: PathBuf,
    targets: HashMap<String, serde_json::Value>,
}

/// A decoded build target.
///
/// `null` for `to` or any of its fields means "use the default".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    /// Dependency references, in build order.
    pub deps: Vec<String>,
    /// Output settings.
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: Output,
}

/// Where and how a target's dependencies are materialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Output {
    /// Output directory, relative to the manifest directory unless absolute.
    #[serde(default = "default_out_dir", deserialize_with = "null_as_out_dir")]
    pub dir: PathBuf,
    /// Copy files instead of linking them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub copy: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_out_dir<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<PathBuf>::deserialize(deserializer)?
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(default_out_dir))
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            copy: false,
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("./")
}

impl Manifest {
    /// Build a manifest from already-parsed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidJson`] if `value` is not an object.
    pub fn from_value(dir: &Path, value: serde_json::Value) -> Result<Self, ManifestError> {
        let targets = serde_json::from_value(value).map_err(|e| ManifestError::InvalidJson {
            path: dir.join(MANIFEST_FILE),
            source: e,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            targets,
        })
    }

    /// Path of the manifest file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Whether `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Decode the target called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::UnknownTarget`] if there is no such target
    /// and [`DependencyError::MalformedTarget`] if its definition lacks a
    /// `deps` list or has fields of the wrong type.
    pub fn target(&self, name: &str) -> Result<Target, DependencyError> {
        let value = self
            .targets
            .get(name)
            .ok_or_else(|| DependencyError::UnknownTarget {
                target: name.to_string(),
                manifest: self.path(),
            })?;
        Target::deserialize(value).map_err(|e| DependencyError::MalformedTarget {
            target: name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Load `build.json` from `dir`.
///
/// # Errors
///
/// Returns [`ManifestError::NotFound`] when the file does not exist,
/// [`ManifestError::InvalidJson`] when it is not a JSON object, and
/// [`ManifestError::Io`] for any other read failure.
pub fn load(dir: &Path) -> Result<Manifest, ManifestError> {
    let path = dir.join(MANIFEST_FILE);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ManifestError::NotFound { path });
        }
        Err(e) => return Err(ManifestError::Io { path, source: e }),
    };
    // bytes that are not UTF-8 are a JSON syntax error, not an I/O failure
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| ManifestError::InvalidJson { path, source: e })?;
    Manifest::from_value(dir, value)
}
