//! Record model

mod dataset;
mod record;
mod value;

pub use dataset::*;
pub use record::*;
pub use value::*;
