//! Shared state threaded through a build.
use std::sync::Arc;

use crate::config::Configuration;
use crate::logging::Log;

/// Shared, read-only state for a build run.
pub struct Context {
    /// Loaded tool configuration.
    pub config: Configuration,
    /// Logger for output and target recording.
    pub log: Arc<dyn Log>,
    /// Preview actions without touching the filesystem.
    pub dry_run: bool,
    /// Run queued copies on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl Context {
    /// Create a context that applies changes, running copies in parallel.
    #[must_use]
    pub fn new(config: Configuration, log: Arc<dyn Log>) -> Self {
        Self {
            config,
            log,
            dry_run: false,
            parallel: true,
        }
    }

    /// Set dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable parallel copies.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
