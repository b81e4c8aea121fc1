use crate::block::BlockElement;
use crate::inline::InlineElement;
use crate::tree::Tree;
use crate::types::{Path, Position, Range};

/// Where in its scope a traversal begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentPosition {
    #[default]
    Begin,
    End,
    SelectionStart,
}

/// Which part of the document a traversal covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentScope {
    Body,
    Block,
    Selection,
}

/// The policy side of a traversal: start point, block membership and
/// inline clipping.
#[derive(Debug, Clone)]
pub enum Scoper {
    /// Everything under the root. `SelectionStart` starts like `Begin`.
    Body { start: ContentPosition },
    /// The single block holding `position`.
    Block {
        block: Option<BlockElement>,
        position: Position,
        start: ContentPosition,
    },
    /// The blocks a range touches, with inline content clipped to it.
    Selection {
        range: Range,
        start_block: Option<BlockElement>,
        end_block: Option<BlockElement>,
    },
}

impl Scoper {
    pub fn body(start: ContentPosition) -> Self {
        Scoper::Body { start }
    }

    pub fn block(tree: Tree<'_>, root: &Path, position: Position, start: ContentPosition) -> Self {
        Scoper::Block {
            block: BlockElement::at_position(tree, root, &position),
            position,
            start,
        }
    }

    /// The range is normalized to leaf positions up front.
    pub fn selection(tree: Tree<'_>, root: &Path, range: &Range) -> Self {
        let range = range.normalize(tree.document);
        Scoper::Selection {
            start_block: BlockElement::at_position(tree, root, range.start()),
            end_block: BlockElement::at_position(tree, root, range.end()),
            range,
        }
    }

    /// Whether traversal from the start point runs forward.
    pub fn is_forward(&self) -> bool {
        !matches!(
            self,
            Scoper::Body {
                start: ContentPosition::End
            } | Scoper::Block {
                start: ContentPosition::End,
                ..
            }
        )
    }

    pub fn start_block(&self, tree: Tree<'_>, root: &Path) -> Option<BlockElement> {
        match self {
            Scoper::Body {
                start: ContentPosition::End,
            } => BlockElement::last(tree, root),
            Scoper::Body { .. } => BlockElement::first(tree, root),
            Scoper::Block { block, .. } => block.clone(),
            Scoper::Selection { start_block, .. } => start_block.clone(),
        }
    }

    /// The inline element a traversal starts at inside `block`, before
    /// trimming.
    pub fn start_inline(&self, tree: Tree<'_>, block: &BlockElement) -> Option<InlineElement> {
        match self {
            Scoper::Body {
                start: ContentPosition::End,
            }
            | Scoper::Block {
                start: ContentPosition::End,
                ..
            } => InlineElement::last(tree, block),
            Scoper::Body { .. }
            | Scoper::Block {
                start: ContentPosition::Begin,
                ..
            } => InlineElement::first(tree, block),
            Scoper::Block { position, .. } => {
                InlineElement::at_position(tree, block, position, true)
            }
            Scoper::Selection { range, .. } => {
                InlineElement::at_position(tree, block, range.start(), true)
            }
        }
    }

    pub fn is_block_in_scope(&self, block: &BlockElement) -> bool {
        match self {
            Scoper::Body { .. } => true,
            Scoper::Block { block: scope, .. } => scope.as_ref() == Some(block),
            Scoper::Selection {
                start_block: Some(start),
                end_block: Some(end),
                ..
            } => {
                block == start || block == end || (block.is_after(start) && end.is_after(block))
            }
            Scoper::Selection { .. } => false,
        }
    }

    /// Restrict `inline` to the scope, or `None` when nothing of it is in
    /// scope.
    pub fn trim_inline_element(
        &self,
        tree: Tree<'_>,
        inline: &InlineElement,
    ) -> Option<InlineElement> {
        match self {
            Scoper::Body { .. } => Some(inline.clone()),
            Scoper::Block { block, .. } => block
                .as_ref()
                .filter(|b| b.contains(inline.container_node()))
                .map(|_| inline.clone()),
            Scoper::Selection { range, .. } => {
                if range.is_collapsed() {
                    return None;
                }
                match inline {
                    InlineElement::Text { start, end } => {
                        let clipped =
                            Range::new(start.clone(), end.clone()).intersection(range)?;
                        if clipped.is_collapsed() {
                            return None;
                        }
                        Some(InlineElement::Text {
                            start: clipped.start().clone(),
                            end: clipped.end().clone(),
                        })
                    }
                    InlineElement::Void(_) => {
                        let start = inline.start_position(tree.document).ok()?;
                        let end = inline.end_position(tree.document).ok()?;
                        (range.contains(&start) && range.contains(&end)).then(|| inline.clone())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::DefaultClassifier;
    use crate::types::{Document, Element, Text};

    fn parts() -> Document {
        Document::new()
            .add_child(Element::new("p").add_child(Text::new("part1")))
            .add_child(Element::new("p").add_child(Text::new("part2")))
    }

    fn pos(doc: &Document, path: Vec<usize>, offset: usize) -> Position {
        Position::new(doc, path.into(), offset).unwrap()
    }

    #[test]
    fn body_start_edges() {
        let doc = parts();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let root = Path::root();
        let begin = Scoper::body(ContentPosition::Begin);
        let end = Scoper::body(ContentPosition::End);
        assert_eq!(begin.start_block(tree, &root), Some(BlockElement::Node(vec![0].into())));
        assert_eq!(end.start_block(tree, &root), Some(BlockElement::Node(vec![1].into())));
        assert!(begin.is_forward());
        assert!(!end.is_forward());
    }

    #[test]
    fn body_trim_is_identity() {
        let doc = parts();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let block = BlockElement::Node(vec![1].into());
        let inline = InlineElement::first(tree, &block).unwrap();
        let scoper = Scoper::body(ContentPosition::Begin);
        assert!(scoper.is_block_in_scope(&block));
        assert_eq!(scoper.trim_inline_element(tree, &inline), Some(inline));
    }

    #[test]
    fn block_scope_membership() {
        let doc = parts();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let scoper = Scoper::block(
            tree,
            &Path::root(),
            pos(&doc, vec![0, 0], 2),
            ContentPosition::Begin,
        );
        assert!(scoper.is_block_in_scope(&BlockElement::Node(vec![0].into())));
        assert!(!scoper.is_block_in_scope(&BlockElement::Node(vec![1].into())));
    }

    #[test]
    fn block_scope_trims_other_blocks() {
        let doc = Document::new()
            .add_child(Element::new("p").add_child(Element::new("span").add_child(Text::new("part1"))))
            .add_child(Element::new("p").add_child(Element::new("span").add_child(Text::new("part2"))));
        let tree = Tree::new(&doc, &DefaultClassifier);
        let root = Path::root();
        let selection = Range::new(pos(&doc, vec![0, 0, 0], 3), pos(&doc, vec![0, 0, 0], 5));
        let scoper = Scoper::block(
            tree,
            &root,
            selection.start().clone(),
            ContentPosition::SelectionStart,
        );

        let part1 = InlineElement::first(tree, &BlockElement::Node(vec![0].into())).unwrap();
        let part2 = InlineElement::first(tree, &BlockElement::Node(vec![1].into())).unwrap();
        assert_eq!(scoper.trim_inline_element(tree, &part1), Some(part1.clone()));
        assert_eq!(scoper.trim_inline_element(tree, &part2), None);

        let block = scoper.start_block(tree, &root).unwrap();
        assert_eq!(scoper.start_inline(tree, &block), Some(part1));
    }

    #[test]
    fn block_scope_start_positions() {
        let doc = Document::new().add_child(
            Element::new("p")
                .add_child(Text::new("a"))
                .add_child(Element::new("img"))
                .add_child(Text::new("b")),
        );
        let tree = Tree::new(&doc, &DefaultClassifier);
        let root = Path::root();
        let anchor = pos(&doc, vec![0, 2], 0);
        let block = BlockElement::Node(vec![0].into());

        let begin = Scoper::block(tree, &root, anchor.clone(), ContentPosition::Begin);
        let end = Scoper::block(tree, &root, anchor.clone(), ContentPosition::End);
        let at = Scoper::block(tree, &root, anchor, ContentPosition::SelectionStart);
        assert_eq!(
            begin.start_inline(tree, &block).map(|i| i.text(tree)),
            Some("a".to_owned())
        );
        assert_eq!(end.start_inline(tree, &block).map(|i| i.text(tree)), Some("b".to_owned()));
        assert_eq!(at.start_inline(tree, &block).map(|i| i.text(tree)), Some("b".to_owned()));
    }

    #[test]
    fn selection_scope_blocks() {
        let doc = parts().add_child(Element::new("p").add_child(Text::new("part3")));
        let tree = Tree::new(&doc, &DefaultClassifier);
        let root = Path::root();
        let range = Range::new(pos(&doc, vec![0, 0], 4), pos(&doc, vec![1, 0], 2));
        let scoper = Scoper::selection(tree, &root, &range);
        assert!(scoper.is_block_in_scope(&BlockElement::Node(vec![0].into())));
        assert!(scoper.is_block_in_scope(&BlockElement::Node(vec![1].into())));
        assert!(!scoper.is_block_in_scope(&BlockElement::Node(vec![2].into())));
    }

    #[test]
    fn selection_scope_clips_text() {
        let doc = parts();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let range = Range::new(pos(&doc, vec![0, 0], 3), pos(&doc, vec![1, 0], 2));
        let scoper = Scoper::selection(tree, &Path::root(), &range);

        let first = InlineElement::first(tree, &BlockElement::Node(vec![0].into())).unwrap();
        let second = InlineElement::first(tree, &BlockElement::Node(vec![1].into())).unwrap();
        let clipped = scoper.trim_inline_element(tree, &first).unwrap();
        assert_eq!(clipped.text(tree), "t1");
        let clipped = scoper.trim_inline_element(tree, &second).unwrap();
        assert_eq!(clipped.text(tree), "pa");
    }

    #[test]
    fn selection_scope_drops_outside_and_touching() {
        let doc = parts();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let range = Range::new(pos(&doc, vec![0, 0], 5), pos(&doc, vec![1, 0], 5));
        let scoper = Scoper::selection(tree, &Path::root(), &range);
        let first = InlineElement::first(tree, &BlockElement::Node(vec![0].into())).unwrap();
        assert_eq!(scoper.trim_inline_element(tree, &first), None);
    }

    #[test]
    fn selection_scope_voids() {
        let doc = Document::new().add_child(
            Element::new("p")
                .add_child(Text::new("ab"))
                .add_child(Element::new("img"))
                .add_child(Text::new("cd"))
                .add_child(Element::new("img")),
        );
        let tree = Tree::new(&doc, &DefaultClassifier);
        let range = Range::new(pos(&doc, vec![0, 0], 1), pos(&doc, vec![0, 2], 1));
        let scoper = Scoper::selection(tree, &Path::root(), &range);
        let inside = InlineElement::Void(vec![0, 1].into());
        let outside = InlineElement::Void(vec![0, 3].into());
        assert_eq!(scoper.trim_inline_element(tree, &inside), Some(inside));
        assert_eq!(scoper.trim_inline_element(tree, &outside), None);
    }

    #[test]
    fn collapsed_selection_trims_everything() {
        let doc = parts();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let range = Range::collapsed(pos(&doc, vec![0, 0], 2));
        let scoper = Scoper::selection(tree, &Path::root(), &range);
        let first = InlineElement::first(tree, &BlockElement::Node(vec![0].into())).unwrap();
        assert_eq!(scoper.trim_inline_element(tree, &first), None);
        assert!(scoper.is_block_in_scope(&BlockElement::Node(vec![0].into())));
    }
}
