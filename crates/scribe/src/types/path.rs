use std::cmp::{Ord, Ordering};
use std::fmt;

/// A list of child indexes that addresses a node from the root container.
///
/// The empty path is the root itself. Paths order in document (pre-order)
/// order: an ancestor sorts before all of its descendants.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Default)]
pub struct Path(Vec<usize>);

impl From<Vec<usize>> for Path {
    fn from(inner: Vec<usize>) -> Self {
        Path(inner)
    }
}

impl From<&[usize]> for Path {
    fn from(inner: &[usize]) -> Self {
        Path(inner.into())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Path {
    pub fn new(inner: Vec<usize>) -> Self {
        Self(inner)
    }

    pub fn root() -> Self {
        Self(vec![])
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<usize> {
        self.0.get(i).copied()
    }

    /// Index of the addressed node inside its parent.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn concat(&self, i: usize) -> Self {
        let mut copy = self.clone();
        copy.0.push(i);
        copy
    }

    /// Whether this path comes after `other` in document order without the
    /// two being related as ancestor and descendant.
    pub fn is_after(&self, other: &Path) -> bool {
        self > other && !other.is_ancestor(self)
    }

    pub fn is_ancestor(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Whether this path comes before `other` in document order without the
    /// two being related as ancestor and descendant.
    pub fn is_before(&self, other: &Path) -> bool {
        self < other && !self.is_ancestor(other)
    }

    pub fn next(&self) -> Option<Path> {
        let (last, head) = self.0.split_last()?;
        let mut n: Vec<_> = head.into();
        n.push(last + 1);

        Some(Path(n))
    }

    pub fn parent(&self) -> Option<Path> {
        let (_, head) = self.0.split_last()?;
        Some(Path(head.into()))
    }

    pub fn previous(&self) -> Option<Path> {
        let (last, head) = self.0.split_last()?;
        let prev = last.checked_sub(1)?;
        let mut n: Vec<_> = head.into();
        n.push(prev);

        Some(Path(n))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
