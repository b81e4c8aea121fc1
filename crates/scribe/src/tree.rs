//! Read-only view of a [`Document`] together with the rules that classify its
//! elements, plus leaf-level navigation in document order.

use crate::types::{Document, Element, Node, Path};

/// Tags treated as block-level by [`DefaultClassifier`].
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "canvas", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "noscript", "ol", "output", "p", "pre", "section", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "ul", "video",
];

/// Tags that never hold content.
pub const VOID_TAGS: &[&str] = &[
    "area", "br", "col", "embed", "hr", "img", "input", "source", "track", "wbr",
];

/// Decides which elements form block boundaries and which are void.
pub trait NodeClassifier {
    fn is_block(&self, element: &Element) -> bool;

    fn is_void(&self, element: &Element) -> bool;

    fn is_line_break(&self, element: &Element) -> bool {
        element.tag() == "br"
    }
}

/// Classifies by tag name using [`BLOCK_TAGS`] and [`VOID_TAGS`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClassifier;

impl NodeClassifier for DefaultClassifier {
    fn is_block(&self, element: &Element) -> bool {
        BLOCK_TAGS.contains(&element.tag())
    }

    fn is_void(&self, element: &Element) -> bool {
        VOID_TAGS.contains(&element.tag())
    }
}

/// What a leaf (a text node or a childless element) contributes to content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Text,
    Void,
    /// An empty block-level element.
    Block,
    /// A childless inline element with no content of its own.
    Transparent,
}

/// A document paired with its classifier.
#[derive(Clone, Copy)]
pub struct Tree<'a> {
    pub document: &'a Document,
    pub classifier: &'a dyn NodeClassifier,
}

impl<'a> Tree<'a> {
    pub fn new(document: &'a Document, classifier: &'a dyn NodeClassifier) -> Self {
        Self {
            document,
            classifier,
        }
    }

    pub fn node(&self, path: &Path) -> Option<&'a Node> {
        self.document.node(path)
    }

    fn element(&self, path: &Path) -> Option<&'a Element> {
        self.node(path).and_then(Node::as_element)
    }

    pub fn is_block(&self, path: &Path) -> bool {
        self.element(path)
            .map_or(false, |e| self.classifier.is_block(e))
    }

    pub fn is_line_break(&self, path: &Path) -> bool {
        self.element(path)
            .map_or(false, |e| self.classifier.is_line_break(e))
    }

    pub fn child_count(&self, path: &Path) -> usize {
        self.document.children_at(path).map_or(0, <[Node]>::len)
    }

    /// Whether the node is a block element or has one among its descendants.
    pub fn is_block_bearing(&self, path: &Path) -> bool {
        match self.node(path) {
            Some(node) => self.bears_block(node),
            None => false,
        }
    }

    fn bears_block(&self, node: &Node) -> bool {
        match node {
            Node::Text(_) => false,
            Node::Element(e) => {
                self.classifier.is_block(e) || e.children().iter().any(|c| self.bears_block(c))
            }
        }
    }

    pub fn has_block_bearing_child(&self, path: &Path) -> bool {
        self.document
            .children_at(path)
            .map_or(false, |children| children.iter().any(|c| self.bears_block(c)))
    }

    /// Classify a leaf. Returns `None` for nodes that still have children.
    pub fn leaf_kind(&self, path: &Path) -> Option<LeafKind> {
        match self.node(path)? {
            Node::Text(_) => Some(LeafKind::Text),
            Node::Element(e) if e.has_children() => None,
            Node::Element(e) if self.classifier.is_block(e) => Some(LeafKind::Block),
            Node::Element(e) if self.classifier.is_void(e) => Some(LeafKind::Void),
            Node::Element(_) => Some(LeafKind::Transparent),
        }
    }

    /// Deepest first descendant, or `path` itself when it has no children.
    pub fn first_leaf(&self, path: &Path) -> Path {
        let mut leaf = path.clone();
        while self.child_count(&leaf) > 0 {
            leaf = leaf.concat(0);
        }
        leaf
    }

    /// Deepest last descendant, or `path` itself when it has no children.
    pub fn last_leaf(&self, path: &Path) -> Path {
        let mut leaf = path.clone();
        loop {
            let count = self.child_count(&leaf);
            if count == 0 {
                return leaf;
            }
            leaf = leaf.concat(count - 1);
        }
    }

    /// First leaf after the subtree of `path`, staying inside `root`.
    pub fn next_leaf(&self, root: &Path, path: &Path) -> Option<Path> {
        let mut current = path.clone();
        while root.is_ancestor(&current) {
            if let Some(next) = current.next().filter(|n| self.document.exists(n)) {
                return Some(self.first_leaf(&next));
            }
            current = current.parent()?;
        }
        None
    }

    /// Last leaf before the subtree of `path`, staying inside `root`.
    pub fn previous_leaf(&self, root: &Path, path: &Path) -> Option<Path> {
        let mut current = path.clone();
        while root.is_ancestor(&current) {
            if let Some(previous) = current.previous() {
                return Some(self.last_leaf(&previous));
            }
            current = current.parent()?;
        }
        None
    }
}
