//! Row selection.

use std::collections::HashSet;
use std::sync::Arc;

/// Aggregate selection over a set of rows, for the header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    None,
    Some,
    All,
}

/// Selected record ids.
///
/// Selection is keyed by id, so it survives filtering and sorting. Storage is
/// copy-on-write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: Arc<HashSet<String>>,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the selection of a row. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let selected = Arc::make_mut(&mut self.selected);
        if selected.remove(id) {
            false
        } else {
            selected.insert(id.to_string());
            true
        }
    }

    /// Sets the selection of a row. Returns true if it changed.
    pub fn set(&mut self, id: &str, value: bool) -> bool {
        if self.is_selected(id) == value {
            return false;
        }
        self.toggle(id);
        true
    }

    /// Sets the selection of every given row.
    pub fn set_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>, value: bool) {
        let selected = Arc::make_mut(&mut self.selected);
        for id in ids {
            if value {
                selected.insert(id.to_string());
            } else {
                selected.remove(id);
            }
        }
    }

    /// Check if a row is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids, in no particular order.
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(|s| s.as_str())
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected = Arc::default();
        }
    }

    /// Returns `true` if `ids` is non-empty and every id is selected.
    pub fn all_selected<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        self.state(ids) == SelectionState::All
    }

    /// Returns `true` if at least one of `ids` is selected.
    pub fn some_selected<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        ids.into_iter().any(|id| self.is_selected(id))
    }

    /// Tri-state over `ids`. An empty set is [`SelectionState::None`].
    pub fn state<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> SelectionState {
        let (mut total, mut hits) = (0usize, 0usize);
        for id in ids {
            total += 1;
            if self.is_selected(id) {
                hits += 1;
            }
        }
        match hits {
            0 => SelectionState::None,
            n if n == total => SelectionState::All,
            _ => SelectionState::Some,
        }
    }

    /// Returns `true` if both selections share the same storage.
    pub fn ptr_eq(&self, other: &SelectionSet) -> bool {
        Arc::ptr_eq(&self.selected, &other.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_tri_state() {
        let mut selection = SelectionSet::new();
        let ids = ["a", "b", "c"];
        assert_eq!(selection.state(ids), SelectionState::None);

        selection.toggle("b");
        assert_eq!(selection.state(ids), SelectionState::Some);
        assert!(selection.some_selected(ids));
        assert!(!selection.all_selected(ids));

        selection.set_all(ids, true);
        assert_eq!(selection.state(ids), SelectionState::All);
        assert!(selection.all_selected(ids));
    }

    #[test]
    fn test_empty_ids_is_none() {
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        let none: [&str; 0] = [];
        assert_eq!(selection.state(none), SelectionState::None);
        assert!(!selection.all_selected(none));
    }

    #[test]
    fn test_set_all_false_only_touches_given_ids() {
        let mut selection = SelectionSet::new();
        selection.set_all(["a", "b", "c"], true);
        selection.set_all(["a", "b"], false);
        assert_eq!(selection.selected_ids().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_snapshot_unaffected_by_writes() {
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        let snapshot = selection.clone();
        selection.toggle("b");
        assert!(!snapshot.is_selected("b"));
        assert_eq!(snapshot.len(), 1);
    }
}
