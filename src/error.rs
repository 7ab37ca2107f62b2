//! Errors reported by the tree.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested order cannot hold a split node.
    #[error("order should be greater than 1, got {order}")]
    InvalidOrder { order: usize },

    /// A structural invariant does not hold. Only produced by `verify`.
    #[error("B+ tree corrupted: {0}")]
    Corrupted(String),
}
