//! Snapshot-based undo history.
//!
//! A [`SnapshotStack`] keeps serialized copies of the document plus the
//! selection at the time, with a cursor pointing at the entry that matches
//! the live content. Undo and redo move the cursor; pushing truncates
//! everything after it.
//!
//! ```text
//!   entries:  [ s0 | s1 | s2 | s3 ]
//!                        ^
//!                      index      undo -> s1, redo -> s3
//! ```

use std::cell::Cell;
use std::hash::Hasher;
use std::rc::Rc;

use rustc_hash::FxHasher;
use tracing::trace;

use crate::types::NativeSelection;

/// Serialized content and selection captured at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    content: String,
    selection: Option<NativeSelection>,
    hash: u64,
}

impl Snapshot {
    pub fn new(content: String, selection: Option<NativeSelection>) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(content.as_bytes());
        Self {
            hash: hasher.finish(),
            content,
            selection,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn selection(&self) -> Option<&NativeSelection> {
        self.selection.as_ref()
    }

    /// Content equality. The selection is not compared.
    pub fn same_content(&self, other: &Snapshot) -> bool {
        self.hash == other.hash && self.content == other.content
    }

    /// Bytes counted against the stack budget.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Bounded undo history.
#[derive(Debug)]
pub struct SnapshotStack {
    entries: Vec<Snapshot>,
    /// Entry matching the live content; `None` while empty.
    index: Option<usize>,
    total_size: usize,
    max_size: usize,
    /// Zero means no limit.
    max_count: usize,
}

impl SnapshotStack {
    pub fn new(max_size: usize, max_count: usize) -> Self {
        Self {
            entries: vec![],
            index: None,
            total_size: 0,
            max_size,
            max_count,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index?)
    }

    /// Record `snapshot` as the new current entry.
    ///
    /// Returns `false` when its content equals the current entry; only the
    /// stored selection is refreshed then. Otherwise entries after the cursor
    /// are dropped and the oldest entries are evicted until the stack fits
    /// its budget.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        if let Some(current) = self.index.and_then(|i| self.entries.get_mut(i)) {
            if current.same_content(&snapshot) {
                current.selection = snapshot.selection;
                trace!(index = ?self.index, "snapshot coalesced");
                return false;
            }
        }

        let keep = self.index.map_or(0, |i| i + 1);
        if keep < self.entries.len() {
            let dropped = self.entries.split_off(keep);
            self.total_size -= dropped.iter().map(Snapshot::size).sum::<usize>();
            trace!(cleared = dropped.len(), "redo history cleared");
        }

        self.total_size += snapshot.size();
        self.entries.push(snapshot);
        self.index = Some(self.entries.len() - 1);
        self.evict();

        trace!(
            len = self.entries.len(),
            size = self.total_size,
            "snapshot pushed"
        );
        true
    }

    fn evict(&mut self) {
        while let Some(index) = self.index.filter(|&i| i > 0) {
            let over_size = self.total_size > self.max_size;
            let over_count = self.max_count > 0 && self.entries.len() > self.max_count;
            if !over_size && !over_count {
                break;
            }
            let evicted = self.entries.remove(0);
            self.total_size -= evicted.size();
            self.index = Some(index - 1);
            trace!(size = evicted.size(), "snapshot evicted");
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index.map_or(false, |i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.map_or(false, |i| i + 1 < self.entries.len())
    }

    /// Step back and return the entry to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let index = self.index? - 1;
        self.index = Some(index);
        self.entries.get(index)
    }

    /// Step forward and return the entry to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        let index = self.index? + 1;
        self.index = Some(index);
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
        self.total_size = 0;
    }
}

/// Undo bookkeeping owned by an editor.
#[derive(Debug)]
pub(crate) struct UndoState {
    pub(crate) stack: SnapshotStack,
    /// Set when the document changed outside any recorded snapshot.
    pub(crate) has_new_content: bool,
    suppressed: Rc<Cell<bool>>,
}

impl UndoState {
    pub(crate) fn new(max_size: usize, max_count: usize) -> Self {
        Self {
            stack: SnapshotStack::new(max_size, max_count),
            has_new_content: false,
            suppressed: Rc::default(),
        }
    }

    pub(crate) fn is_suppressed(&self) -> bool {
        self.suppressed.get()
    }

    /// Enter the outermost undoable operation. Returns `None` when one is
    /// already running.
    pub(crate) fn suppress(&self) -> Option<SuppressGuard> {
        if self.suppressed.replace(true) {
            return None;
        }
        Some(SuppressGuard {
            flag: Rc::clone(&self.suppressed),
        })
    }
}

/// Clears the suppression flag when dropped, including during unwinding.
#[must_use]
pub(crate) struct SuppressGuard {
    flag: Rc<Cell<bool>>,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
