//! `linkbuild` command-line entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use linkbuild::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    logging::init_subscriber(args.verbose, "build");
    let log = Arc::new(logging::Logger::new("build"));

    ExitCode::from(commands::build::run(&args, &log))
}
