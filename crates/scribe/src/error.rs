use thiserror::Error;

use crate::types::Path;

/// Contract violations raised when callers address the document incorrectly.
///
/// Boundary conditions such as "no more blocks" are not errors and are
/// reported as `None` by the traversal APIs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The path does not resolve to a node of the document.
    #[error("no node at path {0}")]
    NodeNotFound(Path),

    /// A text operation was addressed at an element.
    #[error("node at {0} is not a text node")]
    NotText(Path),

    /// A child operation was addressed at a text node.
    #[error("node at {0} cannot hold children")]
    NotContainer(Path),

    #[error("offset {offset} is out of bounds for node at {path} (max {max})")]
    OffsetOutOfBounds {
        path: Path,
        offset: usize,
        max: usize,
    },

    /// The root container cannot be inserted, removed or replaced.
    #[error("the root container has no parent")]
    RootHasNoParent,

    /// A native selection endpoint was empty.
    #[error("malformed selection endpoint {0:?}")]
    MalformedSelection(Vec<usize>),

    /// Serialized content could not be decoded.
    #[error("failed to decode snapshot content: {0}")]
    Snapshot(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
