//! Virtualized editable grid engine
//!
//! Reconciles a large in-memory dataset against a windowed visible-row range,
//! keeps pending cell edits apart from committed data, tracks row selection,
//! and applies column filters and sorting.

pub mod cell;
pub mod column;
pub mod controller;
pub mod error;
pub mod model;
pub mod overlay;
pub mod query;
pub mod section;
pub mod style;
pub mod viewport;

pub use controller::*;
