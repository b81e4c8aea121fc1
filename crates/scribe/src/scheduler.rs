use std::collections::VecDeque;
use std::time::Duration;

use crate::editor::Editor;

/// A task run on the next frame with access to the editor.
pub type DeferredTask = Box<dyn FnOnce(&mut Editor)>;

/// Identifies a deferred task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// Marks which tasks belong to the frame being run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame(u64);

pub(crate) struct Scheduler {
    next_id: u64,
    queue: VecDeque<(TaskHandle, DeferredTask)>,
    idle_interval: Option<Duration>,
    idle_elapsed: Duration,
}

impl Scheduler {
    pub(crate) fn new(idle_interval: Option<Duration>) -> Self {
        Self {
            next_id: 0,
            queue: VecDeque::new(),
            idle_interval: idle_interval.filter(|d| !d.is_zero()),
            idle_elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn defer(&mut self, task: DeferredTask) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.queue.push_back((handle, task));
        handle
    }

    pub(crate) fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|(h, _)| *h != handle);
        self.queue.len() != before
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Start a frame. Tasks deferred from here on wait for the next one.
    pub(crate) fn begin_frame(&self) -> Frame {
        Frame(self.next_id)
    }

    /// The next task queued before `frame` began.
    pub(crate) fn pop_due(&mut self, frame: Frame) -> Option<DeferredTask> {
        let due = matches!(self.queue.front(), Some((TaskHandle(id), _)) if *id < frame.0);
        if !due {
            return None;
        }
        self.queue.pop_front().map(|(_, task)| task)
    }

    /// Accumulate `elapsed` and report whether an idle interval completed.
    pub(crate) fn advance_idle(&mut self, elapsed: Duration) -> bool {
        let Some(interval) = self.idle_interval else {
            return false;
        };
        self.idle_elapsed += elapsed;
        if self.idle_elapsed < interval {
            return false;
        }
        self.idle_elapsed = Duration::ZERO;
        true
    }

    /// Drop all pending tasks and stop the idle timer.
    pub(crate) fn shutdown(&mut self) {
        self.queue.clear();
        self.idle_interval = None;
        self.idle_elapsed = Duration::ZERO;
    }
}
