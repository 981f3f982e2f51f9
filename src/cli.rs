//! Command-line interface.
use std::path::PathBuf;

use clap::Parser;

/// Version string baked in by `build.rs`, falling back to the crate version.
pub const VERSION: &str = match option_env!("LINKBUILD_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Link or copy JavaScript dependencies into output directories, as declared
/// by `build.json` in the working directory.
#[derive(Parser, Debug)]
#[command(name = "linkbuild", version = VERSION)]
pub struct Cli {
    /// Comma-separated list of targets to build
    pub targets: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file [default: ~/.buildconfig]
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Copy files one at a time instead of in parallel
    #[arg(long = "no-parallel", action = clap::ArgAction::SetFalse)]
    pub parallel: bool,
}

impl Cli {
    /// Requested target names, in order, without empty segments.
    #[must_use]
    pub fn target_names(&self) -> Vec<&str> {
        self.targets
            .as_deref()
            .map(|list| list.split(',').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}
