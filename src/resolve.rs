//! Dependency reference parsing and path resolution.
//!
//! A reference has the form `path[:file]`. A `path` starting with `//` is
//! resolved under the configured root; anything else is resolved against the
//! directory of the manifest that declares it. A `file` ending in `.js` is
//! linked directly; any other name refers to a target in the `build.json`
//! found at `path`.
//!
//! Resolution is pure path arithmetic and never touches the filesystem.
use std::path::{Component, Path, PathBuf};

use crate::config::Configuration;
use crate::error::DependencyError;

/// Prefix marking a path as relative to [`Configuration::root`].
const ROOT_PREFIX: &str = "//";

/// Suffix of files that are linked directly.
const FILE_LINK_SUFFIX: &str = ".js";

/// A resolved dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// A single file to link or copy into the output directory.
    FileLink {
        /// Absolute path of the source file.
        source: PathBuf,
        /// Name the file gets in the output directory.
        file_name: String,
    },
    /// Another build target, declared in `manifest_dir/build.json`.
    TargetRef {
        /// Directory holding the manifest that defines `target`.
        manifest_dir: PathBuf,
        /// Name of the referenced target.
        target: String,
    },
}

/// Resolve `reference` against `config` and the manifest directory `base`.
///
/// # Errors
///
/// Returns [`DependencyError::NoTarget`] if the reference has no `:file`
/// part, or an empty one.
pub fn resolve(
    reference: &str,
    config: &Configuration,
    base: &Path,
) -> Result<Dependency, DependencyError> {
    let (path, file) = reference
        .split_once(':')
        .filter(|(_, file)| !file.is_empty())
        .ok_or_else(|| DependencyError::NoTarget(reference.to_string()))?;

    let dir = path.strip_prefix(ROOT_PREFIX).map_or_else(
        || normalize(&base.join(path)),
        |rest| normalize(&config.root.join(rest.trim_start_matches('/'))),
    );

    if file.ends_with(FILE_LINK_SUFFIX) {
        Ok(Dependency::FileLink {
            source: normalize(&dir.join(file)),
            file_name: file.to_string(),
        })
    } else {
        Ok(Dependency::TargetRef {
            manifest_dir: dir,
            target: file.to_string(),
        })
    }
}

/// Lexically fold `.` and `..` components out of `path`.
///
/// `..` never climbs above the root of an absolute path.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> Configuration {
        Configuration {
            root: PathBuf::from("/home/u/src"),
        }
    }

    fn base() -> PathBuf {
        PathBuf::from("/work/app")
    }

    #[test]
    fn root_relative_file_link() {
        let dep = resolve("//libs/ui:widget.js", &config(), &base()).unwrap();
        assert_eq!(
            dep,
            Dependency::FileLink {
                source: PathBuf::from("/home/u/src/libs/ui/widget.js"),
                file_name: "widget.js".to_string(),
            }
        );
    }

    #[test]
    fn base_relative_file_link() {
        let dep = resolve("vendor/lib:index.js", &config(), &base()).unwrap();
        assert_eq!(
            dep,
            Dependency::FileLink {
                source: PathBuf::from("/work/app/vendor/lib/index.js"),
                file_name: "index.js".to_string(),
            }
        );
    }

    #[test]
    fn empty_path_resolves_to_base() {
        let dep = resolve(":main.js", &config(), &base()).unwrap();
        assert!(matches!(
            dep,
            Dependency::FileLink { source, .. } if source == Path::new("/work/app/main.js")
        ));
    }

    #[test]
    fn parent_components_are_folded() {
        let dep = resolve("../shared/./lib:a.js", &config(), &base()).unwrap();
        assert!(matches!(
            dep,
            Dependency::FileLink { source, .. } if source == Path::new("/work/shared/lib/a.js")
        ));
    }

    #[test]
    fn non_js_file_is_target_ref() {
        let dep = resolve("//libs/ui:widgets", &config(), &base()).unwrap();
        assert_eq!(
            dep,
            Dependency::TargetRef {
                manifest_dir: PathBuf::from("/home/u/src/libs/ui"),
                target: "widgets".to_string(),
            }
        );
    }

    #[test]
    fn only_first_colon_splits() {
        let dep = resolve("lib:sub:x.js", &config(), &base()).unwrap();
        assert!(matches!(
            dep,
            Dependency::FileLink { file_name, .. } if file_name == "sub:x.js"
        ));
    }

    #[test]
    fn missing_target_file_is_an_error() {
        assert!(matches!(
            resolve("//libs/ui", &config(), &base()),
            Err(DependencyError::NoTarget(r)) if r == "//libs/ui"
        ));
        assert!(matches!(
            resolve("//libs/ui:", &config(), &base()),
            Err(DependencyError::NoTarget(_))
        ));
    }

    #[test]
    fn single_slash_is_absolute_not_root_relative() {
        let dep = resolve("/opt/js:a.js", &config(), &base()).unwrap();
        assert!(matches!(
            dep,
            Dependency::FileLink { source, .. } if source == Path::new("/opt/js/a.js")
        ));
    }

    #[test]
    fn normalize_keeps_leading_parent_of_relative_path() {
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("a/b/../../..")), PathBuf::from(".."));
    }

    #[test]
    fn resolves_against_each_configuration_independently() {
        let other = Configuration {
            root: PathBuf::from("/srv"),
        };
        let a = resolve("//x:a.js", &config(), &base()).unwrap();
        let b = resolve("//x:a.js", &other, &base()).unwrap();
        assert_ne!(a, b);
    }
}
