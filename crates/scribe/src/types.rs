mod document;
mod element;
mod format;
mod node;
mod path;
mod position;
mod range;
mod selection;
mod text;

pub use document::Document;
pub use element::Element;
pub use format::{DefaultFormat, Marks};
pub use node::Node;
pub use path::Path;
pub use position::Position;
pub use range::Range;
pub use selection::NativeSelection;
pub use text::Text;
