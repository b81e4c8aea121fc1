use crate::block::BlockElement;
use crate::error::Result;
use crate::tree::{LeafKind, Tree};
use crate::types::{Document, Node, Path, Position};

/// A unit of inline content.
///
/// A text run spans every text leaf between two voids or block edges;
/// childless inline elements between its text leaves are glued into it. A
/// run clipped to a selection keeps the same shape with narrower positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineElement {
    Text { start: Position, end: Position },
    Void(Path),
}

impl InlineElement {
    pub fn first(tree: Tree<'_>, block: &BlockElement) -> Option<InlineElement> {
        let leaves = BlockLeaves::new(tree, block)?;
        leaves.element_from(Some(leaves.first.clone()), true)
    }

    pub fn last(tree: Tree<'_>, block: &BlockElement) -> Option<InlineElement> {
        let leaves = BlockLeaves::new(tree, block)?;
        leaves.element_from(Some(leaves.last.clone()), false)
    }

    /// The element holding the node at `path`, extended to its full run.
    pub fn at_node(tree: Tree<'_>, block: &BlockElement, path: &Path) -> Option<InlineElement> {
        if !block.contains(path) {
            return None;
        }
        let leaves = BlockLeaves::new(tree, block)?;
        let leaf = tree.first_leaf(path);
        match tree.leaf_kind(&leaf)? {
            LeafKind::Text => leaves.run_around(&leaf),
            LeafKind::Void => Some(InlineElement::Void(leaf)),
            LeafKind::Transparent => leaves.glued_run(&leaf),
            LeafKind::Block => None,
        }
    }

    /// The element owning `position` when travelling in the given direction.
    ///
    /// A position on the trailing edge of an element belongs to the
    /// following element when moving forward, and one on the leading edge to
    /// the preceding element when moving backward. A position on an empty
    /// inline element belongs to the nearest content in the direction of
    /// travel.
    pub fn at_position(
        tree: Tree<'_>,
        block: &BlockElement,
        position: &Position,
        forward: bool,
    ) -> Option<InlineElement> {
        let leaves = BlockLeaves::new(tree, block)?;
        let position = position.normalize(tree.document);
        let leaf = position.path().clone();
        if !block.contains(&leaf) {
            return None;
        }

        match tree.leaf_kind(&leaf)? {
            LeafKind::Text | LeafKind::Void => {
                let element = leaves.element_from(Some(leaf), forward)?;
                if !element.is_edge(&position, forward) {
                    return Some(element);
                }
                let neighbour = if forward {
                    element.next(tree, block)
                } else {
                    element.previous(tree, block)
                };
                neighbour.or(Some(element))
            }
            LeafKind::Transparent => leaves
                .element_from(Some(leaf.clone()), forward)
                .or_else(|| leaves.element_from(Some(leaf), !forward)),
            LeafKind::Block => None,
        }
    }

    /// The element after this one in `block`. Never leaves the block.
    pub fn next(&self, tree: Tree<'_>, block: &BlockElement) -> Option<InlineElement> {
        if !block.contains(self.container_node()) {
            return None;
        }
        let leaves = BlockLeaves::new(tree, block)?;
        let last = match self {
            InlineElement::Text { end, .. } => leaves.extend(end.path(), true),
            InlineElement::Void(path) => path.clone(),
        };
        leaves.element_from(leaves.step(&last, true), true)
    }

    /// The element before this one in `block`. Never leaves the block.
    pub fn previous(&self, tree: Tree<'_>, block: &BlockElement) -> Option<InlineElement> {
        if !block.contains(self.container_node()) {
            return None;
        }
        let leaves = BlockLeaves::new(tree, block)?;
        let first = match self {
            InlineElement::Text { start, .. } => leaves.extend(start.path(), false),
            InlineElement::Void(path) => path.clone(),
        };
        leaves.element_from(leaves.step(&first, false), false)
    }

    pub fn start_position(&self, document: &Document) -> Result<Position> {
        match self {
            InlineElement::Text { start, .. } => Ok(start.clone()),
            InlineElement::Void(path) => Position::begin(document, path.clone()),
        }
    }

    pub fn end_position(&self, document: &Document) -> Result<Position> {
        match self {
            InlineElement::Text { end, .. } => Ok(end.clone()),
            InlineElement::Void(path) => Position::end(document, path.clone()),
        }
    }

    /// The leaf the element starts in.
    pub fn container_node(&self) -> &Path {
        match self {
            InlineElement::Text { start, .. } => start.path(),
            InlineElement::Void(path) => path,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, InlineElement::Void(_))
    }

    /// The characters between the element's edges. Voids have no text.
    pub fn text(&self, tree: Tree<'_>) -> String {
        let InlineElement::Text { start, end } = self else {
            return String::new();
        };

        let mut out = String::new();
        let mut current = Some(start.path().clone());
        while let Some(leaf) = current {
            if let Some(text) = tree.node(&leaf).and_then(Node::as_text) {
                let from = if leaf == *start.path() { start.offset() } else { 0 };
                let to = if leaf == *end.path() { end.offset() } else { text.len() };
                out.push_str(text.slice(from, to));
            }
            if leaf >= *end.path() {
                break;
            }
            current = tree.next_leaf(&Path::root(), &leaf);
        }
        out
    }

    fn is_edge(&self, position: &Position, forward: bool) -> bool {
        match self {
            InlineElement::Text { start, end } => {
                let edge = if forward { end } else { start };
                position.path() == edge.path() && position.offset() == edge.offset()
            }
            InlineElement::Void(_) => position.is_at_end() == forward,
        }
    }
}

/// Leaf navigation confined to the leaves of one block.
struct BlockLeaves<'a> {
    tree: Tree<'a>,
    root: Path,
    first: Path,
    last: Path,
}

impl<'a> BlockLeaves<'a> {
    fn new(tree: Tree<'a>, block: &BlockElement) -> Option<Self> {
        let root = match block {
            BlockElement::Node(path) => path.clone(),
            BlockElement::StartEnd { start, .. } => start.parent()?,
        };
        Some(Self {
            tree,
            root,
            first: tree.first_leaf(block.start_node()),
            last: tree.last_leaf(block.end_node()),
        })
    }

    fn step(&self, leaf: &Path, forward: bool) -> Option<Path> {
        if forward {
            self.tree
                .next_leaf(&self.root, leaf)
                .filter(|next| *next <= self.last)
        } else {
            self.tree
                .previous_leaf(&self.root, leaf)
                .filter(|previous| *previous >= self.first)
        }
    }

    /// Scan from `leaf` (inclusive) for the first text or void leaf.
    fn element_from(&self, leaf: Option<Path>, forward: bool) -> Option<InlineElement> {
        let mut current = leaf;
        while let Some(leaf) = current {
            match self.tree.leaf_kind(&leaf) {
                Some(LeafKind::Text) => return self.run_around(&leaf),
                Some(LeafKind::Void) => return Some(InlineElement::Void(leaf)),
                _ => current = self.step(&leaf, forward),
            }
        }
        None
    }

    /// The outermost text leaf reachable from `leaf` over text and empty
    /// inline leaves.
    fn extend(&self, leaf: &Path, forward: bool) -> Path {
        let mut edge = leaf.clone();
        let mut current = self.step(leaf, forward);
        while let Some(candidate) = current {
            match self.tree.leaf_kind(&candidate) {
                Some(LeafKind::Text) => edge = candidate.clone(),
                Some(LeafKind::Transparent) => {}
                _ => break,
            }
            current = self.step(&candidate, forward);
        }
        edge
    }

    fn run_around(&self, leaf: &Path) -> Option<InlineElement> {
        let document = self.tree.document;
        let start = Position::begin(document, self.extend(leaf, false)).ok()?;
        let end = Position::end(document, self.extend(leaf, true)).ok()?;
        Some(InlineElement::Text { start, end })
    }

    /// The run an empty inline leaf is glued into, if any text touches it.
    fn glued_run(&self, leaf: &Path) -> Option<InlineElement> {
        for forward in [false, true] {
            let mut current = self.step(leaf, forward);
            while let Some(candidate) = current {
                match self.tree.leaf_kind(&candidate) {
                    Some(LeafKind::Text) => return self.run_around(&candidate),
                    Some(LeafKind::Transparent) => current = self.step(&candidate, forward),
                    _ => break,
                }
            }
        }
        None
    }
}
