// Shared helpers for integration tests.
//
// Provides a temporary workspace with a home directory, a source root and a
// working directory, plus a fluent builder so each integration test can lay
// out manifests and sources without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser as _;
use linkbuild::cli::Cli;
use linkbuild::commands;
use linkbuild::logging::Logger;

/// An isolated build environment backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `home/`           : `~`, holding `.buildconfig` when written
/// - `home/src/`       : source root that `//` paths resolve under
/// - `work/`           : working directory holding the root `build.json`
pub struct Workspace {
    tmp: tempfile::TempDir,
}

impl Workspace {
    /// Create an empty workspace with a config pointing `root` at `~/src`.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let ws = Self { tmp };
        std::fs::create_dir_all(ws.root()).expect("create source root");
        std::fs::create_dir_all(ws.work()).expect("create work dir");
        ws.write_config(r#"{"root": "~/src"}"#);
        ws
    }

    /// `~` for this workspace.
    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    /// Source root.
    pub fn root(&self) -> PathBuf {
        self.home().join("src")
    }

    /// Working directory.
    pub fn work(&self) -> PathBuf {
        self.tmp.path().join("work")
    }

    /// Overwrite `~/.buildconfig`.
    pub fn write_config(&self, content: &str) {
        std::fs::create_dir_all(self.home()).expect("create home");
        std::fs::write(self.home().join(".buildconfig"), content).expect("write .buildconfig");
    }

    /// Write `build.json` into `dir`, creating it as needed.
    pub fn write_manifest(&self, dir: &Path, json: &str) {
        std::fs::create_dir_all(dir).expect("create manifest dir");
        std::fs::write(dir.join("build.json"), json).expect("write build.json");
    }

    /// Create a source file at `dir/name`.
    pub fn write_source(&self, dir: &Path, name: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create source dir");
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write source file");
        path
    }

    /// Run `linkbuild <args>` in the working directory.
    ///
    /// Returns the exit status and the logger holding target results.
    pub fn run(&self, args: &[&str]) -> (u8, Arc<Logger>) {
        let cli = Cli::try_parse_from(std::iter::once("linkbuild").chain(args.iter().copied()))
            .expect("parse arguments");
        let log = Arc::new(Logger::with_log_file(None));
        let status = commands::build::run_in(&self.work(), &self.home(), &cli, &log);
        (status, log)
    }
}
