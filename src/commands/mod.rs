//! Command orchestration: build the requested targets and compute the exit status.
pub mod build;

use crate::build::{Builder, execute};
use crate::logging::{Logger, TargetStatus};

/// Base of the exit status reported when any target fails.
const TARGET_FAILURE_BASE: u8 = 0x70;

/// Build every requested target in order and print the summary.
///
/// A failing target never stops the ones after it. Returns the zero-based
/// positions of the targets that failed.
pub fn run_targets_to_completion(
    names: &[&str],
    builder: &mut Builder<'_>,
    log: &Logger,
) -> Vec<usize> {
    let mut failed = Vec::new();
    for (index, name) in names.iter().enumerate() {
        if execute(builder, name) == TargetStatus::Failed {
            failed.push(index);
        }
    }

    log.print_summary();

    if !failed.is_empty() {
        log.debug(&format!("{} target(s) failed", failed.len()));
    }
    failed
}

/// Fold failed target positions into a process exit status.
///
/// Each failure at position `i` contributes `(i + 1) | 0x70`, truncated to
/// eight bits. No failures gives 0.
#[must_use]
pub fn exit_status(failed: &[usize]) -> u8 {
    failed.iter().fold(0, |status, &index| {
        let low = u8::try_from(index.wrapping_add(1) & 0xff).unwrap_or(u8::MAX);
        status | low | TARGET_FAILURE_BASE
    })
}
