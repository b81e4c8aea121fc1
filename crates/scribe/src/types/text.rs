use serde::{Deserialize, Serialize};

use super::node::Node;

/// A run of character data. Offsets into a text node count `char`s.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Text(String);

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in chars, which is the largest valid offset.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text between two char offsets. Offsets are clamped to the length.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let start = self.byte_index(start);
        let end = self.byte_index(end).max(start);
        &self.0[start..end]
    }

    pub(crate) fn insert(&mut self, offset: usize, text: &str) {
        let at = self.byte_index(offset);
        self.0.insert_str(at, text);
    }

    pub(crate) fn remove(&mut self, offset: usize, len: usize) -> String {
        let start = self.byte_index(offset);
        let end = self.byte_index(offset.saturating_add(len));
        self.0.drain(start..end).collect()
    }

    fn byte_index(&self, offset: usize) -> usize {
        self.0
            .char_indices()
            .nth(offset)
            .map_or(self.0.len(), |(i, _)| i)
    }
}
