//! Per-cell style hooks.

use std::fmt;

use crate::model::{Record, Value};

/// Opaque style identifier attached to a cell, resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleTag(String);

impl StyleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StyleTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chooses a style for a visible cell.
///
/// Called with the committed record, the column id and the effective value
/// (pending edit if any, otherwise committed).
///
/// Any `Fn(&Record, &str, &Value) -> Option<StyleTag>` closure is a hook.
///
/// # Example
///
/// ```
/// use editgrid_lib::model::{Record, Value};
/// use editgrid_lib::style::{CellStyleHook, StyleTag};
///
/// let hook = |_: &Record, column: &str, value: &Value| {
///     (column == "stock" && value.as_number() == Some(0.0))
///         .then(|| StyleTag::from("out-of-stock"))
/// };
/// let record = Record::new("prd-1").set("stock", 0i64);
/// assert_eq!(
///     hook.style(&record, "stock", &Value::Int(0)),
///     Some(StyleTag::from("out-of-stock"))
/// );
/// ```
pub trait CellStyleHook {
    fn style(&self, record: &Record, column_id: &str, value: &Value) -> Option<StyleTag>;
}

impl<F> CellStyleHook for F
where
    F: Fn(&Record, &str, &Value) -> Option<StyleTag>,
{
    fn style(&self, record: &Record, column_id: &str, value: &Value) -> Option<StyleTag> {
        self(record, column_id, value)
    }
}
