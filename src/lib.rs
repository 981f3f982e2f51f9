//! Manifest-driven dependency linker.
//!
//! Reads `build.json` from the working directory and, for each requested
//! target, symlinks (or copies) the JavaScript files it depends on into the
//! target's output directory. Dependencies may also name other targets,
//! which are built first from their own manifests.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: the user configuration and the `build.json` manifest
//! - **[`resolve`]**: turn `path:file` references into file links or target references
//! - **[`resources`]**: idempotent `check + apply` primitives (symlinks, copies)
//! - **[`build`]**: walk a target's dependencies and materialize them
//! - **[`commands`]**: command orchestration and exit status
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod build;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod resolve;
pub mod resources;
