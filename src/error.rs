//! Domain-specific error types for the build engine.
//!
//! Internal modules return typed errors (e.g. [`ManifestError`],
//! [`DependencyError`]) while the command layer converts them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error kinds
//!
//! ```text
//! ConfigError    : recovered: fall back to defaults
//! ManifestError  : fatal: process exit 240/241/255
//! DependencyError: fatal to the enclosing target only
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Exit status when `build.json` does not exist.
pub const EXIT_MANIFEST_NOT_FOUND: u8 = 0xf0;
/// Exit status when `build.json` is not valid JSON.
pub const EXIT_MANIFEST_INVALID: u8 = 0xf1;
/// Exit status for any other unrecoverable error.
pub const EXIT_FAILURE: u8 = 0xff;

/// Errors raised while reading the configuration file.
///
/// These never abort the process; the loader falls back to defaults.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a JSON object with the required properties.
    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// `root` did not resolve to an absolute path.
    #[error("root must be absolute or start with '~': {0}")]
    RelativeRoot(String),
}

/// Errors raised while loading a `build.json` manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("build.json not found!")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The manifest is present but is not a JSON object.
    #[error("build.json isn't valid JSON!")]
    InvalidJson {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Any other failure while reading the manifest.
    #[error("ERR! reading {}: {source}", .path.display())]
    Io {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Process exit status for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotFound { .. } => EXIT_MANIFEST_NOT_FOUND,
            Self::InvalidJson { .. } => EXIT_MANIFEST_INVALID,
            Self::Io { .. } => EXIT_FAILURE,
        }
    }
}

/// Errors that abort the build of a single target.
#[derive(Error, Debug)]
pub enum DependencyError {
    /// A dependency reference has no `:file` part.
    #[error("No target in dependency '{0}'")]
    NoTarget(String),

    /// A target definition does not have the expected shape.
    #[error("Malformed target '{target}': {reason}")]
    MalformedTarget {
        /// Name of the offending target.
        target: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A referenced target does not exist in its manifest.
    #[error("Unknown target '{target}' in {}", .manifest.display())]
    UnknownTarget {
        /// Name that was looked up.
        target: String,
        /// Manifest that was searched.
        manifest: PathBuf,
    },

    /// Target references form a cycle.
    #[error("Target dependency cycle detected: {0}")]
    Cycle(String),
}
