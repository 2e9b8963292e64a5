//! Filtered, sorted row view over a dataset.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use log::trace;

use super::{Direction, FilterSpec, SortSpec};
use crate::cell::display_text;
use crate::column::{Column, ColumnKind};
use crate::model::{Dataset, Record, Value};

static NULL: Value = Value::Null;

/// Which values filtering and sorting look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// Pending edits take precedence over committed values.
    #[default]
    EffectiveValues,
    /// Only committed values count; edits move rows after a save.
    Committed,
}

/// Resolves the value of a record field for filtering and sorting.
pub trait ValueSource {
    /// Returns the value for `column`, or `None` when the record lacks it.
    fn value<'a>(&'a self, record: &'a Record, column: &str) -> Option<&'a Value>;
}

/// Reads committed record values only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Committed;

impl ValueSource for Committed {
    fn value<'a>(&'a self, record: &'a Record, column: &str) -> Option<&'a Value> {
        record.get(column)
    }
}

/// Ordered dataset positions of the rows that pass the filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowView {
    positions: Vec<usize>,
}

impl RowView {
    /// Number of rows in the view.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no row passed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Dataset positions in view order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Dataset position of the row at a view index.
    pub fn position(&self, view_index: usize) -> Option<usize> {
        self.positions.get(view_index).copied()
    }

    /// Records in view order.
    pub fn records<'d>(&'d self, dataset: &'d Dataset) -> impl Iterator<Item = &'d Record> + 'd {
        self.positions.iter().filter_map(|&p| dataset.get(p))
    }

    /// Row ids in view order.
    pub fn ids<'d>(&'d self, dataset: &'d Dataset) -> impl Iterator<Item = &'d str> + 'd {
        self.records(dataset).map(|r| r.id())
    }
}

enum SortKey {
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl SortKey {
    fn of(value: &Value, kind: ColumnKind, column: Option<&Column>) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        match kind {
            ColumnKind::Number => value.as_number().map(SortKey::Number),
            ColumnKind::Date => value.as_datetime().map(SortKey::Date),
            ColumnKind::Text => Some(SortKey::Text(display_text(
                value,
                column.and_then(|c| c.format.as_ref()),
            ))),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Computes the ordered, filtered view of a dataset.
///
/// A record passes when every active filter matches the value `source`
/// resolves for it; missing fields match as null. Sorting is stable in both
/// directions, and values that are null or do not coerce to the column kind
/// sort after every real value.
pub fn compute_view(
    dataset: &Dataset,
    columns: &[Column],
    filters: &FilterSpec,
    sort: &SortSpec,
    source: &impl ValueSource,
) -> RowView {
    let column = |id: &str| columns.iter().find(|c| c.id == id);

    let active: Vec<_> = filters
        .iter()
        .map(|(id, filter)| (id, filter, column(id).and_then(|c| c.format.as_ref())))
        .collect();

    let mut positions: Vec<usize> = dataset
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            active.iter().all(|(id, filter, format)| {
                let value = source.value(record, id).unwrap_or(&NULL);
                filter.matches(value, *format)
            })
        })
        .map(|(position, _)| position)
        .collect();

    if let Some((sort_id, direction)) = sort.active() {
        let sort_column = column(sort_id);
        let kind = match sort_column {
            Some(c) => c.resolved_kind(dataset.get(0)),
            None => ColumnKind::infer(dataset.get(0).and_then(|r| r.get(sort_id))),
        };

        let mut keyed: Vec<(usize, Option<SortKey>)> = positions
            .iter()
            .map(|&p| {
                let key = dataset
                    .get(p)
                    .and_then(|r| source.value(r, sort_id))
                    .and_then(|v| SortKey::of(v, kind, sort_column));
                (p, key)
            })
            .collect();

        keyed.sort_by(|(_, a), (_, b)| match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match direction {
                Direction::Asc => a.compare(b),
                Direction::Desc => b.compare(a),
            },
        });
        positions = keyed.into_iter().map(|(p, _)| p).collect();
    }

    trace!(
        "view: {} of {} rows pass {} filter(s), sort {:?}",
        positions.len(),
        dataset.len(),
        filters.len(),
        sort.active()
    );

    RowView { positions }
}
