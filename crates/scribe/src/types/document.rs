use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::node::Node;
use super::path::Path;
use crate::error::{Error, Result};
use crate::tree::VOID_TAGS;

/// The editable container: an ordered list of top-level nodes.
///
/// Every node is addressed by a [`Path`] from this root; the empty path is
/// the container itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    children: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self { children: vec![] }
    }

    pub fn add_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn child(&self, i: usize) -> Option<&Node> {
        self.children.get(i)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// The node at `path`. The root container is not a node, so the empty
    /// path yields `None`.
    pub fn node(&self, path: &Path) -> Option<&Node> {
        let (first, rest) = path.as_slice().split_first()?;
        self.children.get(*first)?.get(&rest.into())
    }

    pub(crate) fn node_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let (first, rest) = path.as_slice().split_first()?;
        self.children.get_mut(*first)?.get_mut(&rest.into())
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.is_root() || self.node(path).is_some()
    }

    /// Children of the container at `path`; `None` if the path does not
    /// resolve. Text nodes have an empty child list.
    pub fn children_at(&self, path: &Path) -> Option<&[Node]> {
        if path.is_root() {
            return Some(&self.children);
        }
        self.node(path).map(Node::children)
    }

    /// Largest valid offset inside the node at `path`.
    pub fn max_offset(&self, path: &Path) -> Option<usize> {
        if path.is_root() {
            return Some(self.children.len());
        }
        self.node(path).map(Node::max_offset)
    }

    /// Insert `node` so that it ends up at `path`.
    pub fn insert_node(&mut self, path: &Path, node: impl Into<Node>) -> Result<()> {
        let (parent, index) = split(path)?;
        let children = self.container_mut(&parent)?;
        if index > children.len() {
            return Err(Error::OffsetOutOfBounds {
                path: parent,
                offset: index,
                max: children.len(),
            });
        }
        children.insert(index, node.into());
        Ok(())
    }

    pub fn remove_node(&mut self, path: &Path) -> Result<Node> {
        let (parent, index) = split(path)?;
        let children = self.container_mut(&parent)?;
        if index >= children.len() {
            return Err(Error::NodeNotFound(path.clone()));
        }
        Ok(children.remove(index))
    }

    /// Swap the node at `path` for `node`, returning the previous one.
    pub fn replace_node(&mut self, path: &Path, node: impl Into<Node>) -> Result<Node> {
        if path.is_root() {
            return Err(Error::RootHasNoParent);
        }
        let slot = self
            .node_mut(path)
            .ok_or_else(|| Error::NodeNotFound(path.clone()))?;
        Ok(std::mem::replace(slot, node.into()))
    }

    pub fn insert_text(&mut self, path: &Path, offset: usize, text: &str) -> Result<()> {
        match self.node_mut(path) {
            Some(Node::Text(t)) => {
                let max = t.len();
                if offset > max {
                    return Err(Error::OffsetOutOfBounds {
                        path: path.clone(),
                        offset,
                        max,
                    });
                }
                t.insert(offset, text);
                Ok(())
            }
            Some(Node::Element(_)) => Err(Error::NotText(path.clone())),
            None => Err(Error::NodeNotFound(path.clone())),
        }
    }

    pub fn remove_text(&mut self, path: &Path, offset: usize, len: usize) -> Result<String> {
        match self.node_mut(path) {
            Some(Node::Text(t)) => {
                let max = t.len();
                if offset.checked_add(len).filter(|&end| end <= max).is_none() {
                    return Err(Error::OffsetOutOfBounds {
                        path: path.clone(),
                        offset: offset.saturating_add(len),
                        max,
                    });
                }
                Ok(t.remove(offset, len))
            }
            Some(Node::Element(_)) => Err(Error::NotText(path.clone())),
            None => Err(Error::NodeNotFound(path.clone())),
        }
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Markup rendering of the content, used for diagnostics and tests.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_html(child, &mut out);
        }
        out
    }

    /// Portable string form of the whole content.
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Snapshot(e.to_string()))
    }

    pub fn deserialize(content: &str) -> Result<Document> {
        serde_json::from_str(content).map_err(|e| Error::Snapshot(e.to_string()))
    }

    fn container_mut(&mut self, path: &Path) -> Result<&mut Vec<Node>> {
        if path.is_root() {
            return Ok(&mut self.children);
        }
        match self.node_mut(path) {
            Some(Node::Element(e)) => Ok(e.children_mut()),
            Some(Node::Text(_)) => Err(Error::NotContainer(path.clone())),
            None => Err(Error::NodeNotFound(path.clone())),
        }
    }
}

fn split(path: &Path) -> Result<(Path, usize)> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(Error::RootHasNoParent),
    }
}

fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => escape(t.as_str(), false, out),
        Node::Element(e) => {
            out.push('<');
            out.push_str(e.tag());
            for (name, value) in e.attributes() {
                let _ = write!(out, " {}=\"", name);
                escape(value, true, out);
                out.push('"');
            }
            out.push('>');
            if !e.has_children() && VOID_TAGS.contains(&e.tag()) {
                return;
            }
            for child in e.children() {
                write_html(child, out);
            }
            let _ = write!(out, "</{}>", e.tag());
        }
    }
}

fn escape(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{Element, Text};

    fn sample() -> Document {
        Document::new()
            .add_child(Element::new("p").add_child(Text::new("part1")))
            .add_child(Element::new("p").add_child(Text::new("part2")))
    }

    #[test]
    fn remove_text_rejects_overflowing_length() {
        let mut doc = sample();
        assert_eq!(
            doc.remove_text(&vec![0, 0].into(), 1, usize::MAX),
            Err(Error::OffsetOutOfBounds {
                path: vec![0, 0].into(),
                offset: usize::MAX,
                max: 5,
            })
        );
        assert_eq!(doc.text_content(), "part1part2");
    }

    #[test]
    fn node_root_is_none() {
        assert_eq!(sample().node(&Path::root()), None);
        assert!(sample().exists(&Path::root()));
    }

    #[test]
    fn node_success() {
        assert_eq!(
            sample().node(&vec![1, 0].into()),
            Some(&Node::Text(Text::new("part2")))
        );
    }

    #[test]
    fn max_offset_root_and_text() {
        let doc = sample();
        assert_eq!(doc.max_offset(&Path::root()), Some(2));
        assert_eq!(doc.max_offset(&vec![0, 0].into()), Some(5));
        assert_eq!(doc.max_offset(&vec![4].into()), None);
    }

    #[test]
    fn insert_node_success() {
        let mut doc = sample();
        doc.insert_node(&vec![1].into(), Element::new("br")).unwrap();
        assert_eq!(doc.to_html(), "<p>part1</p><br><p>part2</p>");
    }

    #[test]
    fn insert_node_past_end() {
        let mut doc = sample();
        assert_eq!(
            doc.insert_node(&vec![0, 3].into(), Text::new("x")),
            Err(Error::OffsetOutOfBounds {
                path: vec![0].into(),
                offset: 3,
                max: 1
            })
        );
    }

    #[test]
    fn insert_node_into_text() {
        let mut doc = sample();
        assert_eq!(
            doc.insert_node(&vec![0, 0, 0].into(), Text::new("x")),
            Err(Error::NotContainer(vec![0, 0].into()))
        );
    }

    #[test]
    fn remove_node_success() {
        let mut doc = sample();
        let removed = doc.remove_node(&vec![0].into()).unwrap();
        assert_eq!(removed.text_content(), "part1");
        assert_eq!(doc.to_html(), "<p>part2</p>");
    }

    #[test]
    fn remove_root() {
        assert_eq!(
            sample().remove_node(&Path::root()),
            Err(Error::RootHasNoParent)
        );
    }

    #[test]
    fn replace_node_success() {
        let mut doc = sample();
        doc.replace_node(&vec![1, 0].into(), Text::new("other"))
            .unwrap();
        assert_eq!(doc.text_content(), "part1other");
    }

    #[test]
    fn insert_and_remove_text() {
        let mut doc = sample();
        doc.insert_text(&vec![0, 0].into(), 4, "-").unwrap();
        assert_eq!(doc.text_content(), "part-1part2");
        assert_eq!(doc.remove_text(&vec![0, 0].into(), 0, 4).unwrap(), "part");
        assert_eq!(doc.text_content(), "-1part2");
    }

    #[test]
    fn insert_text_into_element() {
        let mut doc = sample();
        assert_eq!(
            doc.insert_text(&vec![0].into(), 0, "x"),
            Err(Error::NotText(vec![0].into()))
        );
    }

    #[test]
    fn to_html_escapes() {
        let doc = Document::new().add_child(
            Element::new("a")
                .with_attribute("title", "\"q\"")
                .add_child(Text::new("a<b & c")),
        );
        assert_eq!(doc.to_html(), "<a title=\"&quot;q&quot;\">a&lt;b &amp; c</a>");
    }

    #[test]
    fn serialize_round_trip() {
        let doc = sample().add_child(Element::new("img").with_attribute("src", "x.png"));
        let content = doc.serialize().unwrap();
        assert_eq!(Document::deserialize(&content).unwrap(), doc);
    }

    #[test]
    fn deserialize_garbage() {
        assert!(matches!(
            Document::deserialize("not json"),
            Err(Error::Snapshot(_))
        ));
    }
}
