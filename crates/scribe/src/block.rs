use crate::error::Result;
use crate::tree::Tree;
use crate::types::{Document, Path, Position};

/// One logical block of content.
///
/// A `Node` block is a single block-level element holding only inline
/// content. A `StartEnd` block is a run of sibling nodes sitting directly
/// under a container that also holds blocks (or under the root), delimited
/// by a line break, a block-bearing sibling, or the container's edge.
#[derive(Debug, Clone, Eq)]
pub enum BlockElement {
    Node(Path),
    StartEnd { start: Path, end: Path },
}

impl PartialEq for BlockElement {
    fn eq(&self, other: &Self) -> bool {
        self.start_node() == other.start_node() && self.end_node() == other.end_node()
    }
}

impl BlockElement {
    pub fn start_node(&self) -> &Path {
        match self {
            BlockElement::Node(path) => path,
            BlockElement::StartEnd { start, .. } => start,
        }
    }

    pub fn end_node(&self) -> &Path {
        match self {
            BlockElement::Node(path) => path,
            BlockElement::StartEnd { end, .. } => end,
        }
    }

    /// The container the block's nodes sit in.
    pub fn parent(&self) -> Option<Path> {
        self.start_node().parent()
    }

    /// Whether `path` is one of the block's nodes or inside one of them.
    pub fn contains(&self, path: &Path) -> bool {
        match self {
            BlockElement::Node(node) => node == path || node.is_ancestor(path),
            BlockElement::StartEnd { start, end } => {
                let (Some(parent), Some(first), Some(last)) =
                    (start.parent(), start.last(), end.last())
                else {
                    return false;
                };
                parent.is_ancestor(path)
                    && path
                        .get(parent.len())
                        .map_or(false, |i| (first..=last).contains(&i))
            }
        }
    }

    /// Whether this block starts after `other` ends.
    pub fn is_after(&self, other: &BlockElement) -> bool {
        self.start_node().is_after(other.end_node())
    }

    pub fn start_position(&self, document: &Document) -> Result<Position> {
        match self {
            BlockElement::Node(path) => Position::begin(document, path.clone()),
            BlockElement::StartEnd { start, .. } => Position::before(document, start),
        }
    }

    pub fn end_position(&self, document: &Document) -> Result<Position> {
        match self {
            BlockElement::Node(path) => Position::end(document, path.clone()),
            BlockElement::StartEnd { end, .. } => Position::after(document, end),
        }
    }

    pub fn text_content(&self, document: &Document) -> String {
        match self {
            BlockElement::Node(path) => document
                .node(path)
                .map(|n| n.text_content())
                .unwrap_or_default(),
            BlockElement::StartEnd { start, end } => {
                let (Some(parent), Some(first), Some(last)) =
                    (start.parent(), start.last(), end.last())
                else {
                    return String::new();
                };
                (first..=last)
                    .filter_map(|i| document.node(&parent.concat(i)))
                    .map(|n| n.text_content())
                    .collect()
            }
        }
    }

    /// The first block under `root`, or `None` when `root` is empty.
    pub fn first(tree: Tree<'_>, root: &Path) -> Option<BlockElement> {
        if tree.child_count(root) == 0 {
            return None;
        }
        Self::at_node(tree, root, &tree.first_leaf(root))
    }

    pub fn last(tree: Tree<'_>, root: &Path) -> Option<BlockElement> {
        if tree.child_count(root) == 0 {
            return None;
        }
        Self::at_node(tree, root, &tree.last_leaf(root))
    }

    pub fn at_position(tree: Tree<'_>, root: &Path, position: &Position) -> Option<BlockElement> {
        let leaf = position.normalize(tree.document);
        Self::at_node(tree, root, leaf.path())
    }

    /// The block containing the node at `path`.
    ///
    /// Walks up from the node's first leaf. The nearest block-level ancestor
    /// that holds only inline content is the block; reaching `root`, or a
    /// container that also holds blocks, makes the block the run of siblings
    /// around the climbing node instead.
    pub fn at_node(tree: Tree<'_>, root: &Path, path: &Path) -> Option<BlockElement> {
        if !root.is_ancestor(path) || !tree.document.exists(path) {
            return None;
        }

        let leaf = tree.first_leaf(path);
        if tree.is_block(&leaf) {
            return Some(BlockElement::Node(leaf));
        }

        let mut child = leaf;
        loop {
            let parent = child.parent()?;
            if parent == *root || tree.has_block_bearing_child(&parent) {
                return Some(Self::run_at(tree, &parent, child.last()?));
            }
            if tree.is_block(&parent) {
                return Some(BlockElement::Node(parent));
            }
            child = parent;
        }
    }

    fn run_at(tree: Tree<'_>, parent: &Path, index: usize) -> BlockElement {
        let count = tree.child_count(parent);

        let mut start = index;
        while start > 0 {
            let previous = parent.concat(start - 1);
            if tree.is_block_bearing(&previous) || tree.is_line_break(&previous) {
                break;
            }
            start -= 1;
        }

        let mut end = index;
        while !tree.is_line_break(&parent.concat(end))
            && end + 1 < count
            && !tree.is_block_bearing(&parent.concat(end + 1))
        {
            end += 1;
        }

        BlockElement::StartEnd {
            start: parent.concat(start),
            end: parent.concat(end),
        }
    }

    pub fn next(&self, tree: Tree<'_>, root: &Path) -> Option<BlockElement> {
        let leaf = tree.next_leaf(root, self.end_node())?;
        Self::at_node(tree, root, &leaf)
    }

    pub fn previous(&self, tree: Tree<'_>, root: &Path) -> Option<BlockElement> {
        let leaf = tree.previous_leaf(root, self.start_node())?;
        Self::at_node(tree, root, &leaf)
    }
}
