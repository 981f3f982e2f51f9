//! Idempotent filesystem primitives used to materialize dependencies.
pub mod copy;
pub mod helpers;
pub mod link;

use anyhow::Result;

pub use copy::CopyResource;
pub use link::LinkResource;

/// State of an output file relative to its desired state.
///
/// # Examples
///
/// ```
/// use linkbuild::resources::ResourceState;
///
/// let wrong = ResourceState::Incorrect { current: "/other/path".into() };
/// assert_ne!(ResourceState::Missing, ResourceState::Correct);
/// assert!(matches!(wrong, ResourceState::Incorrect { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the destination.
    Missing,
    /// The destination already matches.
    Correct,
    /// Something else occupies the destination and will be replaced.
    Incorrect {
        /// Description of what is there now.
        current: String,
    },
}

/// A single output file that can be inspected and applied.
pub trait Resource: Send + Sync {
    /// Human-readable description, e.g. `symlink <source> <dest>`.
    fn description(&self) -> String;

    /// Inspect the destination without changing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be inspected.
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the destination into the desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing destination cannot be removed or the
    /// new file or link cannot be created.
    fn apply(&self) -> Result<()>;
}
