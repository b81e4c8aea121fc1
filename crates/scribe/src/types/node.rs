use serde::{Deserialize, Serialize};

use super::{element::Element, path::Path, text::Text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn child(&self, i: usize) -> Option<&Node> {
        match self {
            Node::Element(e) => e.child(i),
            Node::Text(_) => None,
        }
    }

    /// Child nodes; text nodes have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => e.children(),
            Node::Text(_) => &[],
        }
    }

    /// Largest valid position offset inside this node: the char count of a
    /// text node or the child count of an element.
    pub fn max_offset(&self) -> usize {
        match self {
            Node::Element(e) => e.num_children(),
            Node::Text(t) => t.len(),
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t.as_str()),
            Node::Element(e) => {
                for child in e.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Get the descendant node referred to by a path relative to this node.
    /// An empty path refers to the node itself.
    pub fn get(&self, path: &Path) -> Option<&Node> {
        let mut node = self;

        for i in path.as_slice() {
            node = node.child(*i)?;
        }

        Some(node)
    }

    pub(crate) fn get_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let mut node = self;

        for i in path.as_slice() {
            node = match node {
                Node::Element(e) => e.children_mut().get_mut(*i)?,
                Node::Text(_) => return None,
            };
        }

        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Element::new("p")
            .add_child(Text::new("one"))
            .add_child(Element::new("b").add_child(Text::new("two")))
            .into()
    }

    #[test]
    fn get_self() {
        let input = sample();
        assert_eq!(input.get(&Path::root()), Some(&input));
    }

    #[test]
    fn get_success() {
        let input = sample();
        assert_eq!(
            input.get(&vec![1, 0].into()),
            Some(&Node::Text(Text::new("two")))
        );
    }

    #[test]
    fn get_through_text() {
        let input = sample();
        assert_eq!(input.get(&vec![0, 0].into()), None);
    }

    #[test]
    fn text_content_nested() {
        assert_eq!(sample().text_content(), "onetwo");
    }

    #[test]
    fn max_offset_element_and_text() {
        let input = sample();
        assert_eq!(input.max_offset(), 2);
        assert_eq!(input.child(0).map(Node::max_offset), Some(3));
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut input = sample();
        if let Some(Node::Text(t)) = input.get_mut(&vec![0].into()) {
            t.insert(3, "!");
        }
        assert_eq!(input.text_content(), "one!two");
    }
}
