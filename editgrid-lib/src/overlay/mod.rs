//! Per-row overlays on top of the committed dataset.

mod dirty;
mod selection;

pub use dirty::*;
pub use selection::*;
