//! Filtering, sorting and the derived row view.

mod filter;
mod order;
mod view;

pub use filter::*;
pub use order::*;
pub use view::*;
