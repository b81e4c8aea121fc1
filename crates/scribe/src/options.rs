use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::DefaultFormat;

/// Editor construction settings.
///
/// Every field has a default, so partial configs deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Byte budget of the undo history.
    pub undo_max_size: usize,
    /// Entry budget of the undo history. Zero means no limit.
    pub undo_max_count: usize,
    /// Period of the idle notification; `None` disables it.
    pub idle_interval_ms: Option<u64>,
    pub default_format: DefaultFormat,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            undo_max_size: 10_000_000,
            undo_max_count: 100,
            idle_interval_ms: Some(1000),
            default_format: DefaultFormat::default(),
        }
    }
}

impl EditorOptions {
    pub fn idle_interval(&self) -> Option<Duration> {
        self.idle_interval_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::Marks;

    #[test]
    fn partial_config() {
        let options: EditorOptions = serde_json::from_str(
            r#"{ "undo_max_count": 5, "default_format": { "marks": "BOLD" } }"#,
        )
        .unwrap();
        assert_eq!(options.undo_max_count, 5);
        assert_eq!(options.undo_max_size, 10_000_000);
        assert_eq!(options.idle_interval(), Some(Duration::from_secs(1)));
        assert_eq!(options.default_format.marks, Marks::BOLD);
    }

    #[test]
    fn idle_disabled() {
        let options: EditorOptions =
            serde_json::from_str(r#"{ "idle_interval_ms": null }"#).unwrap();
        assert_eq!(options.idle_interval(), None);
    }
}
