use std::cmp::{Ord, Ordering};

use super::document::Document;
use super::path::Path;
use crate::error::{Error, Result};

/// A caret location: an offset inside the node at `path`.
///
/// For text containers the offset counts chars; for elements (and the root)
/// it counts children, so `(p, k)` sits between child `k - 1` and child `k`.
/// Positions are immutable; [`Position::normalize`] returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    path: Path,
    offset: usize,
    is_at_end: bool,
}

impl Position {
    /// Position at `offset` inside the node at `path`. The offset is clamped
    /// to the node's bounds; a path that does not resolve is an error.
    pub fn new(document: &Document, path: Path, offset: usize) -> Result<Self> {
        let max = max_offset(document, &path)?;
        let offset = offset.min(max);
        Ok(Self {
            path,
            offset,
            is_at_end: offset > 0 && offset >= max,
        })
    }

    pub fn begin(document: &Document, path: Path) -> Result<Self> {
        Self::new(document, path, 0)
    }

    pub fn end(document: &Document, path: Path) -> Result<Self> {
        let offset = max_offset(document, &path)?;
        Ok(Self {
            path,
            offset,
            is_at_end: true,
        })
    }

    /// Position in the parent just before the node at `path`.
    pub fn before(document: &Document, path: &Path) -> Result<Self> {
        let (parent, index) = parent_and_index(document, path)?;
        Self::new(document, parent, index)
    }

    /// Position in the parent just after the node at `path`.
    pub fn after(document: &Document, path: &Path) -> Result<Self> {
        let (parent, index) = parent_and_index(document, path)?;
        Self::new(document, parent, index + 1)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.is_at_end
    }

    /// Push the position down to the deepest leaf it addresses.
    ///
    /// Text containers and containers without children are returned
    /// unchanged. Otherwise the position descends into the child at the
    /// offset (or the last child when at the end) until it reaches a leaf,
    /// and lands at the beginning or end of that leaf.
    pub fn normalize(&self, document: &Document) -> Position {
        let mut path = self.path.clone();
        let mut at_end = self.is_at_end;
        let mut offset = self.offset;

        loop {
            let count = match document.node(&path) {
                _ if path.is_root() => document.num_children(),
                Some(node) if !node.is_text() => node.children().len(),
                _ => break,
            };
            if count == 0 {
                break;
            }
            if at_end || offset >= count {
                at_end = true;
                path = path.concat(count - 1);
            } else {
                path = path.concat(offset);
            }
            offset = 0;
        }

        if path == self.path {
            return self.clone();
        }

        let result = if at_end {
            Position::end(document, path)
        } else {
            Position::begin(document, path)
        };
        result.unwrap_or_else(|_| self.clone())
    }

    /// Same container, offset shifted by `delta` and clamped to its bounds.
    pub fn moved(&self, document: &Document, delta: isize) -> Result<Position> {
        let offset = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        Position::new(document, self.path.clone(), offset)
    }

    pub fn is_after(&self, other: &Position) -> bool {
        self > other
    }

    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    /// Serialized form: the container path followed by the offset.
    pub(crate) fn to_native(&self) -> Vec<usize> {
        let mut native = self.path.as_slice().to_vec();
        native.push(self.offset);
        native
    }

    /// Inverse of [`Position::to_native`]. `at_end` restores the far edge of
    /// an empty node, which the offset alone cannot express.
    pub(crate) fn from_native(
        document: &Document,
        native: &[usize],
        at_end: bool,
    ) -> Result<Position> {
        let (offset, path) = native
            .split_last()
            .ok_or_else(|| Error::MalformedSelection(native.to_vec()))?;
        let mut position = Position::new(document, path.into(), *offset)?;
        if at_end && max_offset(document, &position.path)? == position.offset {
            position.is_at_end = true;
        }
        Ok(position)
    }
}

fn max_offset(document: &Document, path: &Path) -> Result<usize> {
    document
        .max_offset(path)
        .ok_or_else(|| Error::NodeNotFound(path.clone()))
}

fn parent_and_index(document: &Document, path: &Path) -> Result<(Path, usize)> {
    if !document.exists(path) {
        return Err(Error::NodeNotFound(path.clone()));
    }
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(Error::RootHasNoParent),
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.path == other.path {
            return self
                .offset
                .cmp(&other.offset)
                .then(self.is_at_end.cmp(&other.is_at_end));
        }

        // A position inside an element sits before child `offset`'s subtree.
        if self.path.is_ancestor(&other.path) {
            let child = other.path.as_slice()[self.path.len()];
            return if child < self.offset {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        if other.path.is_ancestor(&self.path) {
            let child = self.path.as_slice()[other.path.len()];
            return if child < other.offset {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        self.path.cmp(&other.path)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
