//! Error types for quiesce operations.

use thiserror::Error;

/// Errors surfaced by the registry and by Operating watchers.
///
/// Every variant is a programming-contract violation. Nothing here is
/// transient and nothing is retried internally: the library performs no I/O,
/// so an error means the calling code is wrong, not unlucky.
#[derive(Debug, Error)]
pub enum Error {
    /// No watcher or adapter was ever created under this name.
    #[error("no entry registered under the name {name:?}")]
    NotFound {
        /// The name that missed.
        name: String,
    },

    /// `idle()` was called on a watcher whose busy count is already zero.
    #[error("unbalanced idle() on {name:?}: busy count is already zero")]
    UnbalancedIdle {
        /// Name of the offending watcher.
        name: String,
    },

    /// An empty name was supplied where a name is required.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for quiesce operations.
pub type Result<T> = std::result::Result<T, Error>;
