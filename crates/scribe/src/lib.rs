//! Content model and undo history for rich-text editing surfaces.
//!
//! A [`Document`] is an owned tree of elements and text addressed by
//! [`Path`]s. On top of it sit [`Position`] and [`Range`], the logical
//! [`BlockElement`] and [`InlineElement`] views, scoped traversal with
//! [`ContentTraverser`], and an [`Editor`] that owns the content together
//! with its selection and snapshot-based undo.

mod block;
mod editor;
mod error;
mod event;
mod inline;
mod options;
mod scheduler;
mod scoper;
mod traverser;
mod tree;
mod types;
mod undo;

pub use block::BlockElement;
pub use editor::Editor;
pub use error::{Error, Result};
pub use event::{ChangeSource, EditorEvent, EventDispatcher};
pub use inline::InlineElement;
pub use options::EditorOptions;
pub use scheduler::{DeferredTask, TaskHandle};
pub use scoper::{ContentPosition, ContentScope, Scoper};
pub use traverser::ContentTraverser;
pub use tree::{DefaultClassifier, LeafKind, NodeClassifier, Tree, BLOCK_TAGS, VOID_TAGS};
pub use types::{
    DefaultFormat, Document, Element, Marks, NativeSelection, Node, Path, Position, Range, Text,
};
pub use undo::{Snapshot, SnapshotStack};
