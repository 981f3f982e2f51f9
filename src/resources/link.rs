//! Symlink resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::{occupied, remove_existing};
use super::{Resource, ResourceState};

/// A symlink at `dest` pointing to `source`.
#[derive(Debug, Clone)]
pub struct LinkResource {
    /// What the symlink points to (absolute).
    pub source: PathBuf,
    /// Where the symlink is created.
    pub dest: PathBuf,
}

impl LinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, dest: PathBuf) -> Self {
        Self { source, dest }
    }
}

impl Resource for LinkResource {
    fn description(&self) -> String {
        format!("symlink {} {}", self.source.display(), self.dest.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        match std::fs::read_link(&self.dest) {
            Ok(existing) if existing == self.source => Ok(ResourceState::Correct),
            Ok(existing) => Ok(ResourceState::Incorrect {
                current: format!("points to {}", existing.display()),
            }),
            Err(_) if occupied(&self.dest) => Ok(ResourceState::Incorrect {
                current: "regular file".to_string(),
            }),
            Err(_) => Ok(ResourceState::Missing),
        }
    }

    /// Replace whatever is at `dest` with a fresh symlink.
    ///
    /// The link is always recreated, so re-running a build converges on the
    /// same result. The source is not required to exist.
    fn apply(&self) -> Result<()> {
        remove_existing(&self.dest)?;
        create_symlink(&self.source, &self.dest)
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link)
        .with_context(|| format!("create link: {} -> {}", link.display(), target.display()))?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_file(target, link)
        .with_context(|| format!("create link: {} -> {}", link.display(), target.display()))?;

    Ok(())
}
