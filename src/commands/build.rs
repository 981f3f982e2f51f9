//! The build command.
use std::path::Path;
use std::sync::Arc;

use crate::build::{Builder, Context};
use crate::cli::{Cli, VERSION};
use crate::config::{self, Configuration, manifest};
use crate::error::EXIT_FAILURE;
use crate::logging::{Log, Logger};

use super::{exit_status, run_targets_to_completion};

/// Run a build from the process working directory.
///
/// Returns the process exit status.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> u8 {
    let home = match config::home_dir() {
        Ok(home) => home,
        Err(e) => {
            log.error(&format!("ERR! {e:#}"));
            return EXIT_FAILURE;
        }
    };
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            log.error(&format!("ERR! reading working directory: {e}"));
            return EXIT_FAILURE;
        }
    };
    run_in(&cwd, &home, cli, log)
}

/// Run a build using `cwd/build.json`, with `~` expanding to `home`.
///
/// Returns the process exit status: 0 on success, 240/241/255 when the
/// manifest cannot be loaded, or the combined target failure status.
pub fn run_in(cwd: &Path, home: &Path, cli: &Cli, log: &Arc<Logger>) -> u8 {
    log.debug(&format!("linkbuild {VERSION}"));

    let config = Configuration::load(cli.config.as_deref(), home, &**log);

    let manifest = match manifest::load(cwd) {
        Ok(manifest) => manifest,
        Err(e) => {
            log.error(&e.to_string());
            if let Some(source) = std::error::Error::source(&e) {
                log.debug(&source.to_string());
            }
            return e.exit_code();
        }
    };

    let names = cli.target_names();
    if names.is_empty() {
        log.info("Nothing to build.");
        return 0;
    }

    let ctx = Context::new(config, Arc::clone(log) as Arc<dyn Log>)
        .with_dry_run(cli.dry_run)
        .with_parallel(cli.parallel);
    let mut builder = Builder::new(&ctx, manifest);

    let failed = run_targets_to_completion(&names, &mut builder, log);
    exit_status(&failed)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser as _;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("linkbuild").chain(args.iter().copied()))
    }

    fn logger() -> Arc<Logger> {
        Arc::new(Logger::with_log_file(None))
    }

    #[test]
    fn missing_manifest_exits_240() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_in(dir.path(), dir.path(), &cli(&["app"]), &logger());
        assert_eq!(status, 0xf0);
    }

    #[test]
    fn invalid_manifest_exits_241() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("build.json"), "{not json").unwrap();
        let status = run_in(dir.path(), dir.path(), &cli(&["app"]), &logger());
        assert_eq!(status, 0xf1);
    }

    #[test]
    fn manifest_is_checked_before_target_list() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_in(dir.path(), dir.path(), &cli(&[]), &logger()), 0xf0);
    }

    #[test]
    fn empty_target_list_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("build.json"), "{}").unwrap();
        let log = logger();
        assert_eq!(run_in(dir.path(), dir.path(), &cli(&[",,"]), &log), 0);
        assert!(log.target_entries().is_empty());
    }

    #[test]
    fn unknown_target_does_not_change_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("build.json"), r#"{"ok": {"deps": []}}"#).unwrap();
        let log = logger();
        let status = run_in(dir.path(), dir.path(), &cli(&["ok,missing"]), &log);
        assert_eq!(status, 0);
        assert_eq!(log.failure_count(), 0);
        assert_eq!(log.target_entries().len(), 2);
    }

    #[test]
    fn failure_after_unknown_target_keeps_its_position() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("build.json"), r#"{"bad": {"deps": ["x"]}}"#).unwrap();
        let status = run_in(dir.path(), dir.path(), &cli(&["missing,bad"]), &logger());
        assert_eq!(status, 0x72);
    }
}
