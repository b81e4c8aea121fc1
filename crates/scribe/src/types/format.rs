use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Marks: u32 {
        const BOLD = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
    }
}

impl Default for Marks {
    fn default() -> Self {
        Marks::empty()
    }
}

/// Formatting applied to content typed into an unformatted spot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultFormat {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub marks: Marks,
}

impl DefaultFormat {
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.font_size.is_none()
            && self.text_color.is_none()
            && self.background_color.is_none()
            && self.marks.is_empty()
    }

    /// Whether every mark in `other` is also set here.
    pub fn has_marks(&self, other: Marks) -> bool {
        self.marks.contains(other)
    }
}
