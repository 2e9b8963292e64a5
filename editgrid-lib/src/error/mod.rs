//! Error types

mod dataset;
mod field;
mod grid;
mod section;

pub use dataset::*;
pub use field::*;
pub use grid::*;
pub use section::*;
