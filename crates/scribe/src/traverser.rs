use tracing::trace;

use crate::block::BlockElement;
use crate::inline::InlineElement;
use crate::scoper::{ContentPosition, Scoper};
use crate::tree::Tree;
use crate::types::{Path, Position, Range};

/// Cursor state shared by the block and inline sides of a traverser.
#[derive(Debug, Clone)]
enum Cursor<T> {
    Uninitialized,
    /// `None` when the scope has no starting element at all.
    Positioned(Option<T>),
    /// The last step in `forward`'s direction found nothing. Stepping that
    /// way again keeps returning nothing; stepping back resumes from `last`.
    Exhausted { last: T, forward: bool },
}

impl<T: Clone> Cursor<T> {
    fn current(&self) -> Option<&T> {
        match self {
            Cursor::Uninitialized | Cursor::Positioned(None) => None,
            Cursor::Positioned(Some(current)) => Some(current),
            Cursor::Exhausted { last, .. } => Some(last),
        }
    }

    fn step(&mut self, forward: bool, advance: impl FnOnce(&T) -> Option<T>) -> Option<T> {
        if matches!(self, Cursor::Exhausted { forward: towards, .. } if *towards == forward) {
            return None;
        }
        let current = self.current()?.clone();
        match advance(&current) {
            Some(next) => {
                *self = Cursor::Positioned(Some(next.clone()));
                Some(next)
            }
            None => {
                *self = Cursor::Exhausted {
                    last: current,
                    forward,
                };
                None
            }
        }
    }
}

/// An inline element as found in its block, and as clipped by the scoper.
#[derive(Debug, Clone)]
struct Entry {
    block: BlockElement,
    raw: InlineElement,
    trimmed: InlineElement,
}

/// Walks the content of a scope one block or one inline element at a time.
///
/// The block and inline cursors move independently. Both start lazily at
/// the scoper's start point on first access. Inline stepping crosses into
/// adjacent in-scope blocks and skips elements the scoper trims away.
pub struct ContentTraverser<'a> {
    tree: Tree<'a>,
    root: Path,
    scoper: Scoper,
    block: Cursor<BlockElement>,
    inline: Cursor<Entry>,
}

impl<'a> ContentTraverser<'a> {
    pub fn new(tree: Tree<'a>, root: Path, scoper: Scoper) -> Self {
        Self {
            tree,
            root,
            scoper,
            block: Cursor::Uninitialized,
            inline: Cursor::Uninitialized,
        }
    }

    /// Traverse everything under `root`.
    pub fn body(tree: Tree<'a>, root: Path, start: ContentPosition) -> Self {
        Self::new(tree, root, Scoper::body(start))
    }

    /// Traverse the block holding `position`.
    pub fn block(tree: Tree<'a>, root: Path, position: Position, start: ContentPosition) -> Self {
        let scoper = Scoper::block(tree, &root, position, start);
        Self::new(tree, root, scoper)
    }

    /// Traverse the content covered by `range`.
    pub fn selection(tree: Tree<'a>, root: Path, range: &Range) -> Self {
        let scoper = Scoper::selection(tree, &root, range);
        Self::new(tree, root, scoper)
    }

    pub fn scoper(&self) -> &Scoper {
        &self.scoper
    }

    pub fn current_block(&mut self) -> Option<BlockElement> {
        self.init_block();
        self.block.current().cloned()
    }

    pub fn next_block(&mut self) -> Option<BlockElement> {
        self.step_block(true)
    }

    pub fn previous_block(&mut self) -> Option<BlockElement> {
        self.step_block(false)
    }

    /// The current inline element, trimmed to the scope.
    pub fn current_inline(&mut self) -> Option<InlineElement> {
        self.init_inline();
        self.inline.current().map(|entry| entry.trimmed.clone())
    }

    pub fn next_inline(&mut self) -> Option<InlineElement> {
        self.step_inline(true)
    }

    pub fn previous_inline(&mut self) -> Option<InlineElement> {
        self.step_inline(false)
    }

    fn init_block(&mut self) {
        if let Cursor::Uninitialized = self.block {
            self.block = Cursor::Positioned(self.scoper.start_block(self.tree, &self.root));
        }
    }

    fn init_inline(&mut self) {
        if let Cursor::Uninitialized = self.inline {
            self.inline = Cursor::Positioned(self.start_entry());
        }
    }

    fn step_block(&mut self, forward: bool) -> Option<BlockElement> {
        self.init_block();
        let Self {
            tree,
            root,
            scoper,
            block,
            ..
        } = self;
        let next = block.step(forward, |current| {
            adjacent_block(*tree, root, scoper, current, forward)
        });
        if next.is_none() {
            trace!(forward, "block traversal exhausted");
        }
        next
    }

    fn step_inline(&mut self, forward: bool) -> Option<InlineElement> {
        self.init_inline();
        let Self {
            tree,
            root,
            scoper,
            inline,
            ..
        } = self;
        let next = inline.step(forward, |current| {
            seek(
                *tree,
                root,
                scoper,
                current.block.clone(),
                Some(current.raw.clone()),
                forward,
            )
        });
        if next.is_none() {
            trace!(forward, "inline traversal exhausted");
        }
        next.map(|entry| entry.trimmed)
    }

    fn start_entry(&self) -> Option<Entry> {
        let block = self.scoper.start_block(self.tree, &self.root)?;
        let forward = self.scoper.is_forward();
        let Some(raw) = self.scoper.start_inline(self.tree, &block) else {
            return seek(self.tree, &self.root, &self.scoper, block, None, forward);
        };
        match self.scoper.trim_inline_element(self.tree, &raw) {
            Some(trimmed) => Some(Entry {
                block,
                raw,
                trimmed,
            }),
            None => seek(self.tree, &self.root, &self.scoper, block, Some(raw), forward),
        }
    }
}

/// The block next to `block` in the given direction, if it is in scope.
fn adjacent_block(
    tree: Tree<'_>,
    root: &Path,
    scoper: &Scoper,
    block: &BlockElement,
    forward: bool,
) -> Option<BlockElement> {
    let candidate = if forward {
        block.next(tree, root)?
    } else {
        block.previous(tree, root)?
    };
    let ordered = if forward {
        candidate.is_after(block)
    } else {
        block.is_after(&candidate)
    };
    (ordered && scoper.is_block_in_scope(&candidate)).then_some(candidate)
}

/// Find the next inline element past `raw` that survives trimming, crossing
/// into adjacent in-scope blocks as needed. With no `raw`, the search starts
/// at the edge of `block`.
fn seek(
    tree: Tree<'_>,
    root: &Path,
    scoper: &Scoper,
    mut block: BlockElement,
    mut raw: Option<InlineElement>,
    forward: bool,
) -> Option<Entry> {
    loop {
        let candidate = match &raw {
            Some(current) if forward => current.next(tree, &block),
            Some(current) => current.previous(tree, &block),
            None if forward => InlineElement::first(tree, &block),
            None => InlineElement::last(tree, &block),
        };

        match candidate {
            Some(candidate) => {
                if let Some(trimmed) = scoper.trim_inline_element(tree, &candidate) {
                    return Some(Entry {
                        block,
                        raw: candidate,
                        trimmed,
                    });
                }
                raw = Some(candidate);
            }
            None => {
                block = adjacent_block(tree, root, scoper, &block, forward)?;
                raw = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::tree::DefaultClassifier;
    use crate::types::{Document, Element, Text};

    fn pos(doc: &Document, path: Vec<usize>, offset: usize) -> Position {
        Position::new(doc, path.into(), offset).unwrap()
    }

    fn texts(traverser: &mut ContentTraverser<'_>, tree: Tree<'_>) -> Vec<String> {
        let mut out = vec![];
        let mut current = traverser.current_inline();
        while let Some(inline) = current {
            out.push(inline.text(tree));
            current = traverser.next_inline();
        }
        out
    }

    fn sample() -> Document {
        Document::new()
            .add_child(Element::new("p").add_child(Text::new("one")))
            .add_child(Element::new("p"))
            .add_child(
                Element::new("p")
                    .add_child(Text::new("two"))
                    .add_child(Element::new("img"))
                    .add_child(Text::new("three")),
            )
            .add_child(Text::new("four"))
    }

    #[test]
    fn single_paragraph() {
        let doc = Document::new().add_child(Element::new("p").add_child(Text::new("example")));
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::Begin);
        let block = traverser.current_block().unwrap();
        assert_eq!(block, BlockElement::Node(vec![0].into()));
        assert_eq!(block.text_content(&doc), "example");
        assert_eq!(traverser.next_block(), None);
    }

    #[test]
    fn text_and_line_break() {
        let doc = Document::new()
            .add_child(Text::new("www.example.com"))
            .add_child(Element::new("br"));
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::Begin);
        assert_eq!(
            traverser.current_block(),
            Some(BlockElement::StartEnd {
                start: vec![0].into(),
                end: vec![1].into(),
            })
        );
        assert_eq!(traverser.next_block(), None);
    }

    #[test]
    fn empty_root() {
        let doc = Document::new();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::Begin);
        assert_eq!(traverser.current_block(), None);
        assert_eq!(traverser.current_inline(), None);
        assert_eq!(traverser.next_block(), None);
        assert_eq!(traverser.next_inline(), None);
    }

    #[test]
    fn body_inlines_cross_blocks() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::Begin);
        assert_eq!(
            texts(&mut traverser, tree),
            vec!["one", "two", "", "three", "four"]
        );
    }

    #[test]
    fn body_from_end_walks_backward() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::End);
        let mut out = vec![traverser.current_inline().unwrap().text(tree)];
        while let Some(inline) = traverser.previous_inline() {
            out.push(inline.text(tree));
        }
        assert_eq!(out, vec!["four", "three", "", "two", "one"]);
    }

    #[test]
    fn blocks_forward_and_back() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::Begin);
        let mut forward = vec![traverser.current_block().unwrap()];
        while let Some(block) = traverser.next_block() {
            forward.push(block);
        }
        assert_eq!(forward.len(), 4);

        let mut backward = vec![];
        while let Some(block) = traverser.previous_block() {
            backward.push(block);
        }
        backward.reverse();
        assert_eq!(backward, forward[..3].to_vec());
    }

    #[test]
    fn exhaustion_is_sticky() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::Begin);
        while traverser.next_inline().is_some() {}
        assert_eq!(traverser.next_inline(), None);
        assert_eq!(traverser.next_inline(), None);
        assert_eq!(
            traverser.current_inline().map(|i| i.text(tree)),
            Some("four".to_owned())
        );
        assert_eq!(
            traverser.previous_inline().map(|i| i.text(tree)),
            Some("three".to_owned())
        );
    }

    #[test]
    fn block_scope_does_not_cross() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::block(
            tree,
            Path::root(),
            pos(&doc, vec![2, 0], 1),
            ContentPosition::Begin,
        );
        assert_eq!(texts(&mut traverser, tree), vec!["two", "", "three"]);
        assert_eq!(traverser.next_block(), None);
        assert_eq!(traverser.previous_block(), None);
    }

    #[test]
    fn block_scope_from_selection_start() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let mut traverser = ContentTraverser::block(
            tree,
            Path::root(),
            pos(&doc, vec![2, 2], 2),
            ContentPosition::SelectionStart,
        );
        assert_eq!(texts(&mut traverser, tree), vec!["three"]);
    }

    #[test]
    fn selection_scope_clips_and_crosses() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let range = Range::new(pos(&doc, vec![0, 0], 1), pos(&doc, vec![2, 2], 3));
        let mut traverser = ContentTraverser::selection(tree, Path::root(), &range);
        assert_eq!(texts(&mut traverser, tree), vec!["ne", "two", "", "thr"]);
    }

    #[test]
    fn selection_start_on_run_edge_moves_forward() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let range = Range::new(pos(&doc, vec![0, 0], 3), pos(&doc, vec![2, 0], 2));
        let mut traverser = ContentTraverser::selection(tree, Path::root(), &range);
        assert_eq!(texts(&mut traverser, tree), vec!["tw"]);
    }

    #[test]
    fn collapsed_selection_yields_nothing() {
        let doc = sample();
        let tree = Tree::new(&doc, &DefaultClassifier);
        let range = Range::collapsed(pos(&doc, vec![2, 0], 1));
        let mut traverser = ContentTraverser::selection(tree, Path::root(), &range);
        assert_eq!(traverser.current_inline(), None);
        assert_eq!(traverser.next_inline(), None);
        assert_eq!(
            traverser.current_block(),
            Some(BlockElement::Node(vec![2].into()))
        );
    }

    fn arbitrary_document() -> impl Strategy<Value = Document> {
        let leaf = prop_oneof![
            "[a-c]{0,3}".prop_map(|s| Element::new("span").add_child(Text::new(s))),
            Just(Element::new("br")),
            Just(Element::new("img")),
            Just(Element::new("span")),
            "[a-c]{1,3}".prop_map(|s| Element::new("p").add_child(Text::new(s))),
            Just(Element::new("p")),
        ];
        prop::collection::vec(leaf, 0..8).prop_map(|children| {
            children
                .into_iter()
                .fold(Document::new(), |doc, child| doc.add_child(child))
        })
    }

    proptest! {
        #[test]
        fn traversal_terminates(doc in arbitrary_document()) {
            let tree = Tree::new(&doc, &DefaultClassifier);
            let bound = doc.num_children() + 1;

            let mut traverser = ContentTraverser::body(tree, Path::root(), ContentPosition::Begin);
            let mut steps = 0;
            while traverser.next_block().is_some() {
                steps += 1;
                prop_assert!(steps <= bound);
            }
            prop_assert_eq!(traverser.next_block(), None);

            let mut steps = 0;
            while traverser.next_inline().is_some() {
                steps += 1;
                prop_assert!(steps <= bound);
            }
            prop_assert_eq!(traverser.next_inline(), None);
        }
    }
}
