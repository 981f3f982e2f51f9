//! Core logging types: target entries, status, and the [`Log`] trait.

/// Target build result for summary reporting.
#[derive(Debug, Clone)]
pub struct TargetEntry {
    /// Target name as requested on the command line.
    pub name: String,
    /// Final status of the target.
    pub status: TargetStatus,
    /// Optional detail message (e.g. the error that failed the target).
    pub message: Option<String>,
}

/// Status of a finished target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// Every dependency was materialized.
    Ok,
    /// Target ran in dry-run mode; no changes were applied.
    DryRun,
    /// Requested name is not defined in the manifest.
    Skipped,
    /// Target aborted or one of its copies failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// Build code logs through this trait so tests can substitute a recorder.
/// `Send + Sync` because copy work runs on the rayon pool.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a target result for the summary.
    fn record_target(&self, name: &str, status: TargetStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_status_equality() {
        assert_eq!(TargetStatus::Ok, TargetStatus::Ok);
        assert_ne!(TargetStatus::Ok, TargetStatus::Failed);
        assert_ne!(TargetStatus::DryRun, TargetStatus::Failed);
        assert_ne!(TargetStatus::Skipped, TargetStatus::Failed);
    }

    #[test]
    fn target_entry_clone() {
        let entry = TargetEntry {
            name: "app".to_string(),
            status: TargetStatus::Failed,
            message: Some("No target".to_string()),
        };
        let cloned = entry.clone();
        assert_eq!(cloned.name, entry.name);
        assert_eq!(cloned.status, entry.status);
        assert_eq!(cloned.message, entry.message);
    }
}
