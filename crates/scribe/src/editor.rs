use std::convert::Infallible;
use std::mem;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::event::{ChangeSource, EditorEvent, EventDispatcher};
use crate::options::EditorOptions;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::scoper::{ContentPosition, ContentScope};
use crate::traverser::ContentTraverser;
use crate::tree::{DefaultClassifier, NodeClassifier, Tree};
use crate::types::{DefaultFormat, Document, NativeSelection, Path, Position, Range};
use crate::undo::{Snapshot, SnapshotStack, UndoState};

type Disposer = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// An editing session over one document.
///
/// The editor owns the content, the selection and the undo history. The
/// host feeds it selection and focus changes, pumps deferred work with
/// [`Editor::run_frame`] and [`Editor::tick`], and receives notifications
/// through an [`EventDispatcher`].
pub struct Editor {
    document: Document,
    classifier: Box<dyn NodeClassifier>,
    selection: Option<Range>,
    /// Selection saved on blur, restored on focus.
    cached_selection: Option<NativeSelection>,
    has_focus: bool,
    default_format: DefaultFormat,
    undo: UndoState,
    dispatcher: Option<Box<dyn EventDispatcher>>,
    scheduler: Scheduler,
    disposers: Vec<Disposer>,
    disposed: bool,
}

impl Editor {
    pub fn new(document: Document, options: EditorOptions) -> Self {
        Self::with_classifier(document, DefaultClassifier, options)
    }

    /// Create an editor whose block and void elements are decided by
    /// `classifier`. The initial content becomes the first undo entry.
    pub fn with_classifier(
        document: Document,
        classifier: impl NodeClassifier + 'static,
        options: EditorOptions,
    ) -> Self {
        let mut editor = Self {
            document,
            classifier: Box::new(classifier),
            selection: None,
            cached_selection: None,
            has_focus: false,
            undo: UndoState::new(options.undo_max_size, options.undo_max_count),
            scheduler: Scheduler::new(options.idle_interval()),
            default_format: options.default_format,
            dispatcher: None,
            disposers: vec![],
            disposed: false,
        };
        editor.push_snapshot();
        editor
    }

    pub fn set_dispatcher(&mut self, dispatcher: impl EventDispatcher + 'static) {
        self.dispatcher = Some(Box::new(dispatcher));
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the content. Changes made through it are recorded
    /// by the next undo snapshot.
    pub fn document_mut(&mut self) -> &mut Document {
        self.undo.has_new_content = true;
        &mut self.document
    }

    pub fn tree(&self) -> Tree<'_> {
        Tree::new(&self.document, self.classifier.as_ref())
    }

    /// A traverser over `scope`. Block and selection scopes follow the
    /// current selection and are unavailable without one.
    pub fn content_traverser(
        &self,
        scope: ContentScope,
        position: ContentPosition,
    ) -> Option<ContentTraverser<'_>> {
        let tree = self.tree();
        let root = Path::root();
        match scope {
            ContentScope::Body => Some(ContentTraverser::body(tree, root, position)),
            ContentScope::Block => {
                let range = self.selection.as_ref()?;
                Some(ContentTraverser::block(
                    tree,
                    root,
                    range.start().clone(),
                    position,
                ))
            }
            ContentScope::Selection => {
                let range = self.selection.as_ref()?;
                Some(ContentTraverser::selection(tree, root, range))
            }
        }
    }

    pub fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, range: Range) {
        self.selection = Some(range);
    }

    /// Apply a selection reported by the host.
    pub fn select_native(&mut self, native: &NativeSelection) -> Result<()> {
        self.selection = Some(Range::from_native(&self.document, native)?);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn focus(&mut self) {
        if self.has_focus {
            return;
        }
        self.has_focus = true;
        if let Some(native) = self.cached_selection.take() {
            self.selection = self.resolve_selection(&native);
        }
    }

    pub fn blur(&mut self) {
        if !self.has_focus {
            return;
        }
        self.has_focus = false;
        self.cached_selection = self
            .selection
            .take()
            .map(|range| range.to_native().clone());
    }

    pub fn default_format(&self) -> &DefaultFormat {
        &self.default_format
    }

    pub fn set_default_format(&mut self, format: DefaultFormat) {
        self.default_format = format;
    }

    /// Replace the whole document as one undoable change.
    pub fn set_content(&mut self, document: Document) {
        self.run_with_undo(
            |editor| {
                editor.document = document;
                editor.selection = None;
                Ok::<_, Infallible>(())
            },
            Some(ChangeSource::SetContent),
            None,
        )
        .unwrap_or_else(|never| match never {});
    }

    /// The portable string form of the document.
    pub fn content(&self) -> Result<String> {
        self.document.serialize()
    }

    /// Run `callback` as a single undoable change.
    ///
    /// The outermost call records the content before and after the callback
    /// and, when `change_source` is set, raises
    /// [`EditorEvent::ContentChanged`] carrying `get_data`'s value. Calls
    /// nested inside the callback just run their own callback. When the
    /// callback fails its error is returned as is: the snapshot taken
    /// before it stays, and nothing is recorded after it or announced.
    pub fn run_with_undo<T, E, F>(
        &mut self,
        callback: F,
        change_source: Option<ChangeSource>,
        get_data: Option<&dyn Fn() -> Value>,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut Editor) -> Result<T, E>,
    {
        let Some(guard) = self.undo.suppress() else {
            return callback(self);
        };

        self.push_snapshot();
        let value = callback(self)?;
        self.push_snapshot();

        if let Some(source) = change_source {
            let data = get_data.map(|get| get());
            self.trigger_event(EditorEvent::ContentChanged { source, data });
        }
        drop(guard);
        Ok(value)
    }

    /// Record the current content unless an undoable change is running.
    pub fn add_undo_snapshot(&mut self) {
        if self.undo.is_suppressed() {
            return;
        }
        self.push_snapshot();
    }

    pub fn can_undo(&self) -> bool {
        self.undo.has_new_content || self.undo.stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.undo.has_new_content && self.undo.stack.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.undo.has_new_content {
            self.push_snapshot();
        }
        let Some(snapshot) = self.undo.stack.undo().cloned() else {
            return false;
        };
        debug!(len = self.undo.stack.len(), "undo");
        self.restore(&snapshot);
        true
    }

    /// Step forward in the history. Content changed since the last
    /// snapshot is recorded first, which discards the redo entries.
    pub fn redo(&mut self) -> bool {
        if self.undo.has_new_content {
            self.push_snapshot();
        }
        let Some(snapshot) = self.undo.stack.redo().cloned() else {
            return false;
        };
        debug!(len = self.undo.stack.len(), "redo");
        self.restore(&snapshot);
        true
    }

    /// Drop the history, keeping the current content as its only entry.
    pub fn clear_undo(&mut self) {
        self.undo.stack.clear();
        self.push_snapshot();
    }

    pub fn undo_stack(&self) -> &SnapshotStack {
        &self.undo.stack
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let selection = self.selection.as_ref().map(|r| r.to_native().clone());
        Ok(Snapshot::new(self.document.serialize()?, selection))
    }

    fn push_snapshot(&mut self) {
        match self.snapshot() {
            Ok(snapshot) => {
                self.undo.stack.push(snapshot);
                self.undo.has_new_content = false;
            }
            Err(err) => warn!(error = %err, "failed to capture undo snapshot"),
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        match Document::deserialize(snapshot.content()) {
            Ok(document) => self.document = document,
            Err(err) => {
                warn!(error = %err, "failed to restore undo snapshot");
                return;
            }
        }
        self.undo.has_new_content = false;
        self.selection = snapshot
            .selection()
            .and_then(|native| self.resolve_selection(native));
        self.trigger_event(EditorEvent::ContentChanged {
            source: ChangeSource::SetContent,
            data: None,
        });
    }

    /// `native` against the current content, or a caret at the start of the
    /// content when it no longer resolves.
    fn resolve_selection(&self, native: &NativeSelection) -> Option<Range> {
        match Range::from_native(&self.document, native) {
            Ok(range) => return Some(range),
            Err(err) => warn!(error = %err, "selection no longer resolves, moving to start"),
        }
        let start = Position::new(&self.document, Path::root(), 0).ok()?;
        Some(Range::collapsed(start.normalize(&self.document)))
    }

    pub fn trigger_event(&mut self, event: EditorEvent) {
        if self.disposed {
            return;
        }
        if let Some(dispatcher) = self.dispatcher.as_mut() {
            let broadcast = event.is_broadcast();
            dispatcher.trigger_event(&event, broadcast);
        }
    }

    /// Queue `task` for the next frame. Returns `None` once disposed.
    pub fn defer(&mut self, task: impl FnOnce(&mut Editor) + 'static) -> Option<TaskHandle> {
        if self.disposed {
            return None;
        }
        Some(self.scheduler.defer(Box::new(task)))
    }

    pub fn cancel_deferred(&mut self, handle: TaskHandle) -> bool {
        self.scheduler.cancel(handle)
    }

    /// Run the tasks queued before this call. Tasks they queue wait for the
    /// next frame. Returns how many ran.
    pub fn run_frame(&mut self) -> usize {
        let frame = self.scheduler.begin_frame();
        let mut ran = 0;
        while !self.disposed {
            let Some(task) = self.scheduler.pop_due(frame) else {
                break;
            };
            task(self);
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, pending = self.scheduler.pending(), "frame done");
        }
        ran
    }

    /// Advance the idle timer, raising [`EditorEvent::Idle`] each time an
    /// interval completes.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.disposed && self.scheduler.advance_idle(elapsed) {
            self.trigger_event(EditorEvent::Idle);
        }
    }

    /// Register teardown work run by [`Editor::dispose`]. Runs immediately
    /// if the editor is already disposed.
    pub fn on_dispose(&mut self, disposer: impl FnOnce() -> anyhow::Result<()> + 'static) {
        if self.disposed {
            run_disposer(Box::new(disposer));
            return;
        }
        self.disposers.push(Box::new(disposer));
    }

    /// Release everything the editor holds. Every disposer runs even when
    /// an earlier one fails; pending tasks and the idle timer are dropped.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for disposer in mem::take(&mut self.disposers) {
            run_disposer(disposer);
        }
        self.scheduler.shutdown();
        self.dispatcher = None;
        debug!("editor disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

fn run_disposer(disposer: Disposer) {
    if let Err(err) = disposer() {
        warn!(error = %err, "disposer failed");
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.dispose();
    }
}
