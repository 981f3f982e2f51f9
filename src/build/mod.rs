//! Target building: resolve each dependency in order and materialize it.
//!
//! A [`Builder`] owns the manifests loaded during a run. Building a target
//! creates its output directory, then walks `deps` in manifest order:
//!
//! - file links are symlinked immediately, or queued for copying;
//! - target references are built recursively from their own manifest.
//!
//! The first resolution or link failure stops the walk. Queued copies always
//! run to completion (in parallel unless disabled) before the target's result
//! is known, and any copy failure fails the target.
mod context;

pub use context::Context;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::manifest::{self, Manifest, Target};
use crate::error::DependencyError;
use crate::logging::TargetStatus;
use crate::resolve::{Dependency, normalize, resolve};
use crate::resources::helpers::fs::ensure_dir;
use crate::resources::{CopyResource, LinkResource, Resource, ResourceState};

/// Identifies a target across manifests: `(manifest_dir, name)`.
type TargetKey = (PathBuf, String);

/// Builds targets from one root manifest and any manifests it references.
#[derive(Debug)]
pub struct Builder<'a> {
    ctx: &'a Context,
    root_dir: PathBuf,
    manifests: HashMap<PathBuf, Manifest>,
    in_progress: Vec<TargetKey>,
    completed: HashSet<TargetKey>,
}

impl<'a> Builder<'a> {
    /// Create a builder whose top-level targets come from `manifest`.
    #[must_use]
    pub fn new(ctx: &'a Context, manifest: Manifest) -> Self {
        let root_dir = manifest.dir.clone();
        let mut manifests = HashMap::new();
        manifests.insert(root_dir.clone(), manifest);
        Self {
            ctx,
            root_dir,
            manifests,
            in_progress: Vec::new(),
            completed: HashSet::new(),
        }
    }

    /// Build the target `name` of the root manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is unknown or malformed, a dependency
    /// has no target file, a referenced target fails or forms a cycle, or a
    /// filesystem operation fails.
    pub fn build(&mut self, name: &str) -> Result<()> {
        let dir = self.root_dir.clone();
        self.build_in(&dir, name)
    }

    fn root_manifest(&self) -> Option<&Manifest> {
        self.manifests.get(&self.root_dir)
    }

    fn build_in(&mut self, dir: &Path, name: &str) -> Result<()> {
        let key = (dir.to_path_buf(), name.to_string());
        if self.completed.contains(&key) {
            self.ctx
                .log
                .debug(&format!("target \"{name}\" already built, skipping"));
            return Ok(());
        }
        if self.in_progress.contains(&key) {
            return Err(DependencyError::Cycle(cycle_chain(&self.in_progress, &key)).into());
        }

        let target = self.manifest(dir)?.target(name)?;
        self.ctx.log.stage(&format!("Building target \"{name}\""));

        self.in_progress.push(key.clone());
        let result = self.build_target(dir, &target);
        self.in_progress.pop();

        if result.is_ok() {
            self.completed.insert(key);
        }
        result
    }

    /// Loaded manifest for `dir`, reading `dir/build.json` on first use.
    fn manifest(&mut self, dir: &Path) -> Result<&Manifest> {
        if !self.manifests.contains_key(dir) {
            let path = dir.join(manifest::MANIFEST_FILE);
            let loaded =
                manifest::load(dir).with_context(|| format!("loading {}", path.display()))?;
            self.manifests.insert(dir.to_path_buf(), loaded);
        }
        self.manifests
            .get(dir)
            .ok_or_else(|| anyhow::anyhow!("manifest cache miss: {}", dir.display()))
    }

    fn build_target(&mut self, dir: &Path, target: &Target) -> Result<()> {
        let out_dir = normalize(&dir.join(&target.to.dir));
        if self.ctx.dry_run {
            if !out_dir.exists() {
                self.ctx
                    .log
                    .dry_run(&format!("would create directory {}", out_dir.display()));
            }
        } else {
            ensure_dir(&out_dir)?;
        }

        let mut copies = Vec::new();
        let walked = self.walk_deps(dir, target, &out_dir, &mut copies);
        let copied = self.run_copies(&copies);
        walked?;
        copied
    }

    fn walk_deps(
        &mut self,
        dir: &Path,
        target: &Target,
        out_dir: &Path,
        copies: &mut Vec<CopyResource>,
    ) -> Result<()> {
        for reference in &target.deps {
            match resolve(reference, &self.ctx.config, dir)? {
                Dependency::FileLink { source, file_name } => {
                    let dest = out_dir.join(&file_name);
                    if normalize(&dest) == source {
                        self.ctx.log.debug(&format!(
                            "skip {reference}: {} is its own destination",
                            source.display()
                        ));
                    } else if target.to.copy {
                        let resource = CopyResource::new(source, dest);
                        if self.ctx.dry_run {
                            self.ctx
                                .log
                                .dry_run(&format!("would {}", resource.description()));
                        } else {
                            self.ctx.log.info(&resource.description());
                            copies.push(resource);
                        }
                    } else {
                        self.link(&LinkResource::new(source, dest))?;
                    }
                }
                Dependency::TargetRef {
                    manifest_dir,
                    target: name,
                } => {
                    self.ctx.log.debug(&format!(
                        "{reference} refers to target \"{name}\" in {}",
                        manifest_dir.display()
                    ));
                    self.build_in(&manifest_dir, &name)
                        .with_context(|| format!("building dependency target \"{name}\""))?;
                }
            }
        }
        Ok(())
    }

    fn link(&self, resource: &LinkResource) -> Result<()> {
        if self.ctx.dry_run {
            if resource.current_state()? == ResourceState::Correct {
                self.ctx
                    .log
                    .debug(&format!("ok: {} (already linked)", resource.dest.display()));
            } else {
                self.ctx
                    .log
                    .dry_run(&format!("would {}", resource.description()));
            }
            return Ok(());
        }
        resource.apply()?;
        self.ctx.log.info(&format!("✔ {}", resource.description()));
        Ok(())
    }

    /// Apply every queued copy and wait for all of them.
    fn run_copies(&self, copies: &[CopyResource]) -> Result<()> {
        if copies.is_empty() {
            return Ok(());
        }
        let log = &self.ctx.log;
        let apply = |resource: &CopyResource| -> Option<String> {
            resource.apply().err().map(|e| {
                let msg = format!("Error copying {}: {e:#}", resource.source.display());
                log.error(&msg);
                msg
            })
        };

        let errors: Vec<String> = if self.ctx.parallel {
            use rayon::prelude::*;
            copies.par_iter().filter_map(apply).collect()
        } else {
            copies.iter().filter_map(apply).collect()
        };

        if errors.is_empty() {
            log.debug(&format!("{} file(s) copied", copies.len()));
            Ok(())
        } else {
            anyhow::bail!(
                "{} of {} copies failed: {}",
                errors.len(),
                copies.len(),
                errors.join("; ")
            )
        }
    }
}

/// Render the cycle closed by `key` as `a → b → a`.
fn cycle_chain(in_progress: &[TargetKey], key: &TargetKey) -> String {
    let start = in_progress.iter().position(|k| k == key).unwrap_or(0);
    in_progress
        .iter()
        .skip(start)
        .chain(std::iter::once(key))
        .map(|(_, name)| name.as_str())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Build a requested target, recording its result in the logger.
///
/// A name missing from the root manifest is skipped with a warning rather
/// than failed; missing names reached through a dependency still fail.
pub fn execute(builder: &mut Builder<'_>, name: &str) -> TargetStatus {
    if !builder.root_manifest().is_some_and(|m| m.contains(name)) {
        let log = &builder.ctx.log;
        log.warn(&format!("Unknown target \"{name}\", skipping"));
        log.record_target(name, TargetStatus::Skipped, Some("not in build.json"));
        return TargetStatus::Skipped;
    }
    match builder.build(name) {
        Ok(()) => {
            let status = if builder.ctx.dry_run {
                TargetStatus::DryRun
            } else {
                TargetStatus::Ok
            };
            builder.ctx.log.record_target(name, status, None);
            status
        }
        Err(e) => {
            let log = &builder.ctx.log;
            log.error(&format!("Failed to build target \"{name}\""));
            log.error(&format!("Error was: {e:#}"));
            log.record_target(name, TargetStatus::Failed, Some(&format!("{e:#}")));
            TargetStatus::Failed
        }
    }
}
