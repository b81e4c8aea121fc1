use std::cell::OnceCell;

use super::document::Document;
use super::position::Position;
use super::selection::NativeSelection;
use crate::error::Result;

/// An ordered pair of positions.
///
/// Callers supply `start` no later than `end` in document order; the range
/// never reorders them. The native form is built lazily and kept.
#[derive(Debug, Clone)]
pub struct Range {
    start: Position,
    end: Position,
    native: OnceCell<NativeSelection>,
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Range {}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            native: OnceCell::new(),
        }
    }

    pub fn collapsed(position: Position) -> Self {
        Self::new(position.clone(), position)
    }

    /// Resolve a native selection against `document`.
    pub fn from_native(document: &Document, native: &NativeSelection) -> Result<Self> {
        let start = Position::from_native(document, &native.start, native.start_at_end)?;
        let end = Position::from_native(document, &native.end, native.end_at_end)?;
        Ok(Self::new(start, end))
    }

    pub fn to_native(&self) -> &NativeSelection {
        self.native.get_or_init(|| NativeSelection {
            start: self.start.to_native(),
            end: self.end.to_native(),
            start_at_end: self.start.is_at_end(),
            end_at_end: self.end.is_at_end(),
        })
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn end(&self) -> &Position {
        &self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn is_expanded(&self) -> bool {
        !self.is_collapsed()
    }

    pub fn contains(&self, target: &Position) -> bool {
        target >= &self.start && target <= &self.end
    }

    pub fn intersection(&self, another: &Range) -> Option<Range> {
        let start = if self.start.is_before(&another.start) {
            &another.start
        } else {
            &self.start
        };
        let end = if self.end.is_before(&another.end) {
            &self.end
        } else {
            &another.end
        };
        if end.is_before(start) {
            None
        } else {
            Some(Range::new(start.clone(), end.clone()))
        }
    }

    /// Both endpoints pushed down to leaves.
    pub fn normalize(&self, document: &Document) -> Range {
        Range::new(self.start.normalize(document), self.end.normalize(document))
    }
}
