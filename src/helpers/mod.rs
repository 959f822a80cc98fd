//! Helper functions for page rendering

mod html;
mod toc;

pub use html::*;
pub use toc::{AnchorRegistry, Toc, TocEntry, NO_SECTIONS_MESSAGE};
