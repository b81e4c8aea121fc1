use serde::{Deserialize, Serialize};

/// Host-native form of a selection: each endpoint is the container path
/// followed by the offset inside it.
///
/// This is what the selection provider hands over and what undo snapshots
/// store, so it must stay meaningful after the range that produced it is
/// gone. The `*_at_end` flags keep the far edge of an empty node (an image,
/// an empty paragraph) apart from its near edge, which share offset 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeSelection {
    pub start: Vec<usize>,
    pub end: Vec<usize>,
    #[serde(default)]
    pub start_at_end: bool,
    #[serde(default)]
    pub end_at_end: bool,
}

impl NativeSelection {
    pub fn new(start: Vec<usize>, end: Vec<usize>) -> Self {
        Self {
            start,
            end,
            start_at_end: false,
            end_at_end: false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end && self.start_at_end == self.end_at_end
    }
}
