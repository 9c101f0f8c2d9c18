//! Viso Geometry
//!
//! Rectangles and root-margin math shared by the notifier and the
//! viewport engine.

mod margin;
mod rect;

pub use margin::{MarginParseError, MarginValue, RootMargin};
pub use rect::Rect;
