use serde_json::Value;

/// What caused a content change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    Format,
    SetContent,
    Paste,
    Cut,
    Keyboard,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ContentChanged {
        source: ChangeSource,
        data: Option<Value>,
    },
    /// The editor has been idle for one interval.
    Idle,
}

impl EditorEvent {
    /// Whether the host should forward the event to every listener.
    pub fn is_broadcast(&self) -> bool {
        matches!(self, EditorEvent::ContentChanged { .. })
    }
}

/// Receives editor events. The editor only raises them; routing is up to
/// the host.
pub trait EventDispatcher {
    fn trigger_event(&mut self, event: &EditorEvent, broadcast: bool);
}

impl<F> EventDispatcher for F
where
    F: FnMut(&EditorEvent, bool),
{
    fn trigger_event(&mut self, event: &EditorEvent, broadcast: bool) {
        self(event, broadcast)
    }
}
