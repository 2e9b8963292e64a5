//! Column filter types.

use std::collections::BTreeMap;

use crate::cell::display_text;
use crate::column::CellFormat;
use crate::model::{Value, parse_number};

/// Substring filter. Matching ignores case.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFilter {
    pattern: String,
    folded: String,
}

impl TextFilter {
    /// Creates a substring filter.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let folded = pattern.to_lowercase();
        Self { pattern, folded }
    }

    /// The pattern as typed.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if `text` contains the pattern, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        self.folded.is_empty() || text.to_lowercase().contains(&self.folded)
    }
}

/// A filter condition on one column.
///
/// # Example
///
/// ```
/// use editgrid_lib::query::ColumnFilter;
/// use editgrid_lib::model::Value;
///
/// // Typed bounds, either side optional
/// let thirties = ColumnFilter::range(Some(30.0), Some(39.0));
/// assert!(thirties.matches(&Value::Int(33), None));
///
/// // Raw input from min/max boxes; garbage is an absent bound
/// let open = ColumnFilter::range_input("30", "abc");
/// assert!(open.matches(&Value::Int(99), None));
///
/// let name = ColumnFilter::contains("ali");
/// assert!(name.matches(&Value::from("Alice"), None));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Inclusive numeric range. An absent bound leaves that side open.
    Range { min: Option<f64>, max: Option<f64> },
    /// Case-insensitive substring match on the display string.
    Contains(TextFilter),
}

impl ColumnFilter {
    /// Creates a numeric range filter.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        ColumnFilter::Range { min, max }
    }

    /// Creates a range filter from raw min/max text.
    ///
    /// Blank or non-numeric text becomes an absent bound.
    pub fn range_input(min: &str, max: &str) -> Self {
        ColumnFilter::Range {
            min: parse_number(min),
            max: parse_number(max),
        }
    }

    /// Creates a substring filter.
    pub fn contains(pattern: impl Into<String>) -> Self {
        ColumnFilter::Contains(TextFilter::new(pattern))
    }

    /// Returns `false` when the filter constrains nothing.
    pub fn is_active(&self) -> bool {
        match self {
            ColumnFilter::Range { min, max } => min.is_some() || max.is_some(),
            ColumnFilter::Contains(text) => !text.pattern().is_empty(),
        }
    }

    /// Drops inactive filters and orders reversed bounds.
    pub fn normalized(self) -> Option<Self> {
        if !self.is_active() {
            return None;
        }
        Some(match self {
            ColumnFilter::Range {
                min: Some(lo),
                max: Some(hi),
            } if lo > hi => ColumnFilter::Range {
                min: Some(hi),
                max: Some(lo),
            },
            other => other,
        })
    }

    /// Tests a value.
    ///
    /// Range filters coerce the value to a number; values that do not coerce
    /// fail an active range. Text filters compare against the display string,
    /// using the column format when one is given.
    pub fn matches(&self, value: &Value, format: Option<&CellFormat>) -> bool {
        match self {
            ColumnFilter::Range { min, max } => {
                if min.is_none() && max.is_none() {
                    return true;
                }
                let Some(n) = value.as_number() else {
                    return false;
                };
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }
            ColumnFilter::Contains(text) => text.matches(&display_text(value, format)),
        }
    }
}

/// Active filters keyed by column id.
///
/// Inactive filters are never stored, so an empty spec means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    filters: BTreeMap<String, ColumnFilter>,
}

impl FilterSpec {
    /// Creates an empty filter spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (builder pattern).
    pub fn with(mut self, column: impl Into<String>, filter: ColumnFilter) -> Self {
        self.set(column, filter);
        self
    }

    /// Sets a column filter; an inactive filter removes the entry.
    ///
    /// Returns `true` if the spec changed.
    pub fn set(&mut self, column: impl Into<String>, filter: ColumnFilter) -> bool {
        let column = column.into();
        match filter.normalized() {
            Some(filter) => {
                if self.filters.get(&column) == Some(&filter) {
                    return false;
                }
                self.filters.insert(column, filter);
                true
            }
            None => self.filters.remove(&column).is_some(),
        }
    }

    /// Removes a column filter. Returns `true` if one was present.
    pub fn remove(&mut self, column: &str) -> bool {
        self.filters.remove(column).is_some()
    }

    /// Removes all filters. Returns `true` if any were present.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.filters.is_empty();
        self.filters.clear();
        had_any
    }

    /// Returns the filter for a column.
    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters.get(column)
    }

    /// Iterates over `(column, filter)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnFilter)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
