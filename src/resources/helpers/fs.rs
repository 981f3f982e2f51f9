//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Permission bits for newly created output directories.
#[cfg(unix)]
const OUT_DIR_MODE: u32 = 0o755;

/// Create `dir` if it does not exist yet.
///
/// Only the last component is created; a missing parent is an error rather
/// than being created implicitly. On Unix the directory gets mode `0755`
/// (subject to the process umask).
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    let mut builder = std::fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        builder.mode(OUT_DIR_MODE);
    }
    builder
        .create(dir)
        .with_context(|| format!("create directory: {}", dir.display()))
}

/// Whether anything, including a dangling symlink, exists at `path`.
#[must_use]
pub fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed (e.g. it is a
/// real directory).
pub fn remove_existing(path: &Path) -> Result<()> {
    if occupied(path) {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}
