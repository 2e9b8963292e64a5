//! Pending cell edits.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::model::{Dataset, Record, Value};
use crate::query::ValueSource;

/// Pending edits keyed by record id, then column id.
///
/// Edits never touch the dataset until [`DirtyOverlay::commit`] folds them
/// into a new one. Storage is copy-on-write: clones share the map until one
/// side writes.
///
/// # Example
///
/// ```
/// use editgrid_lib::model::{Dataset, Record, Value};
/// use editgrid_lib::overlay::DirtyOverlay;
///
/// let dataset = Dataset::new(vec![Record::new("p-1").set("age", 25i64)]).unwrap();
/// let mut dirty = DirtyOverlay::new();
/// dirty.set_cell("p-1", "age", Value::Int(31));
///
/// let committed = dirty.commit(&dataset);
/// assert_eq!(committed.find("p-1").unwrap().get("age"), Some(&Value::Int(31)));
/// assert_eq!(dataset.find("p-1").unwrap().get("age"), Some(&Value::Int(25)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirtyOverlay {
    edits: Arc<HashMap<String, HashMap<String, Value>>>,
}

impl DirtyOverlay {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pending value for one cell.
    pub fn set_cell(
        &mut self,
        row_id: impl Into<String>,
        column_id: impl Into<String>,
        value: Value,
    ) {
        Arc::make_mut(&mut self.edits)
            .entry(row_id.into())
            .or_default()
            .insert(column_id.into(), value);
    }

    /// Returns the pending value of a cell, if any.
    pub fn get(&self, row_id: &str, column_id: &str) -> Option<&Value> {
        self.edits.get(row_id).and_then(|row| row.get(column_id))
    }

    /// Returns the overlay value if present, otherwise `base`.
    pub fn effective_value<'a>(
        &'a self,
        row_id: &str,
        column_id: &str,
        base: Option<&'a Value>,
    ) -> Option<&'a Value> {
        self.get(row_id, column_id).or(base)
    }

    /// Returns `true` if the cell has a pending edit.
    pub fn is_dirty(&self, row_id: &str, column_id: &str) -> bool {
        self.get(row_id, column_id).is_some()
    }

    /// Returns `true` if any cell of the row has a pending edit.
    pub fn is_row_dirty(&self, row_id: &str) -> bool {
        self.edits.contains_key(row_id)
    }

    /// Pending edits of one row.
    pub fn row_edits(&self, row_id: &str) -> Option<&HashMap<String, Value>> {
        self.edits.get(row_id)
    }

    /// Ids of the rows with pending edits, in no particular order.
    pub fn edited_rows(&self) -> impl Iterator<Item = &str> {
        self.edits.keys().map(|k| k.as_str())
    }

    /// Number of edited cells.
    pub fn len(&self) -> usize {
        self.edits.values().map(|row| row.len()).sum()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Folds the pending edits into `dataset`, returning the new snapshot.
    ///
    /// Edited fields are replaced and the rest keep their base values. Rows
    /// without edits are shared with `dataset`. Edits for rows that no longer
    /// exist, or for fields outside the schema, are dropped.
    pub fn commit(&self, dataset: &Dataset) -> Dataset {
        if self.is_empty() {
            return dataset.clone();
        }

        let mut applied = 0usize;
        let next = dataset.map_records(|record| {
            let changes = self.edits.get(record.id())?;
            applied += 1;
            Some(record.with_fields(changes.iter().filter(|(field, _)| record.contains(field))))
        });

        let dropped = self.edits.len() - applied;
        if dropped > 0 {
            warn!("Dropped pending edits for {} row(s) no longer in the dataset", dropped);
        }
        debug!("Committed edits for {} row(s)", applied);
        next
    }

    /// Drops every pending edit.
    pub fn discard(&mut self) {
        if !self.is_empty() {
            debug!("Discarding {} pending edit(s)", self.len());
            self.edits = Arc::default();
        }
    }

    /// Drops the pending edits of the given rows.
    pub fn remove_rows<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let ids: Vec<&str> = ids
            .into_iter()
            .filter(|id| self.edits.contains_key(*id))
            .collect();
        if ids.is_empty() {
            return;
        }
        let edits = Arc::make_mut(&mut self.edits);
        for id in ids {
            edits.remove(id);
        }
    }

    /// Returns `true` if both overlays share the same storage.
    pub fn ptr_eq(&self, other: &DirtyOverlay) -> bool {
        Arc::ptr_eq(&self.edits, &other.edits)
    }
}

impl ValueSource for DirtyOverlay {
    fn value<'a>(&'a self, record: &'a Record, column: &str) -> Option<&'a Value> {
        self.effective_value(record.id(), column, record.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Record::new("p-1").set("name", "Ann").set("age", 25i64),
            Record::new("p-2").set("name", "Bob").set("age", 40i64),
        ])
        .unwrap()
    }

    #[test]
    fn test_overlay_takes_precedence() {
        let mut dirty = DirtyOverlay::new();
        let base = Value::Int(25);
        assert_eq!(dirty.effective_value("p-1", "age", Some(&base)), Some(&base));

        dirty.set_cell("p-1", "age", Value::Int(31));
        assert_eq!(dirty.effective_value("p-1", "age", Some(&base)), Some(&Value::Int(31)));
        assert!(dirty.is_dirty("p-1", "age"));
        assert!(!dirty.is_dirty("p-1", "name"));
        assert_eq!(dirty.len(), 1);
    }

    #[test]
    fn test_commit_shares_untouched_rows() {
        let dataset = dataset();
        let mut dirty = DirtyOverlay::new();
        dirty.set_cell("p-1", "age", Value::Int(31));

        let next = dirty.commit(&dataset);
        let p1 = next.find("p-1").unwrap();
        assert_eq!(p1.get("age"), Some(&Value::Int(31)));
        assert_eq!(p1.get("name"), Some(&Value::from("Ann")));
        assert!(Arc::ptr_eq(next.shared(1).unwrap(), dataset.shared(1).unwrap()));
        assert!(!Arc::ptr_eq(next.shared(0).unwrap(), dataset.shared(0).unwrap()));
    }

    #[test]
    fn test_commit_drops_edits_for_missing_rows_and_fields() {
        let dataset = dataset();
        let mut dirty = DirtyOverlay::new();
        dirty.set_cell("gone", "age", Value::Int(1));
        dirty.set_cell("p-2", "nickname", Value::from("B"));

        let next = dirty.commit(&dataset);
        assert_eq!(next.len(), 2);
        assert!(!next.find("p-2").unwrap().contains("nickname"));
        assert_eq!(next.schema(), dataset.schema());
    }

    #[test]
    fn test_clone_is_copy_on_write() {
        let mut dirty = DirtyOverlay::new();
        dirty.set_cell("p-1", "age", Value::Int(31));
        let snapshot = dirty.clone();
        assert!(snapshot.ptr_eq(&dirty));

        dirty.set_cell("p-2", "age", Value::Int(41));
        assert!(!snapshot.ptr_eq(&dirty));
        assert!(!snapshot.is_row_dirty("p-2"));
    }

    #[test]
    fn test_discard_and_remove_rows() {
        let mut dirty = DirtyOverlay::new();
        dirty.set_cell("p-1", "age", Value::Int(31));
        dirty.set_cell("p-2", "age", Value::Int(41));

        dirty.remove_rows(["p-1"]);
        assert!(!dirty.is_row_dirty("p-1"));
        assert_eq!(dirty.edited_rows().collect::<Vec<_>>(), vec!["p-2"]);

        dirty.discard();
        assert!(dirty.is_empty());
    }
}
