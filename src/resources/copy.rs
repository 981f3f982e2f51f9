//! Copied-file resource.
use anyhow::{Context as _, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::PathBuf;

use super::helpers::fs::{occupied, remove_existing};
use super::{Resource, ResourceState};

/// A regular file at `dest` holding the bytes of `source`.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// File to read.
    pub source: PathBuf,
    /// File to write.
    pub dest: PathBuf,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, dest: PathBuf) -> Self {
        Self { source, dest }
    }
}

impl Resource for CopyResource {
    fn description(&self) -> String {
        format!("copy {} {}", self.source.display(), self.dest.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !occupied(&self.dest) {
            return Ok(ResourceState::Missing);
        }
        let meta = std::fs::symlink_metadata(&self.dest)
            .with_context(|| format!("reading metadata: {}", self.dest.display()))?;
        let current = if meta.is_symlink() {
            "symlink"
        } else {
            "existing file"
        };
        Ok(ResourceState::Incorrect {
            current: current.to_string(),
        })
    }

    /// Stream the source into the destination, overwriting it.
    ///
    /// A symlink at `dest` (left by an earlier link-mode build) is removed
    /// first so the write cannot land in the linked source file.
    fn apply(&self) -> Result<()> {
        let reader = File::open(&self.source)
            .with_context(|| format!("open source: {}", self.source.display()))?;

        if std::fs::symlink_metadata(&self.dest).is_ok_and(|m| m.is_symlink()) {
            remove_existing(&self.dest)?;
        }

        let writer = File::create(&self.dest)
            .with_context(|| format!("create file: {}", self.dest.display()))?;

        let mut reader = BufReader::new(reader);
        let mut writer = BufWriter::new(writer);
        std::io::copy(&mut reader, &mut writer).with_context(|| {
            format!(
                "copy {} to {}",
                self.source.display(),
                self.dest.display()
            )
        })?;
        writer
            .flush()
            .with_context(|| format!("flush: {}", self.dest.display()))
    }
}
