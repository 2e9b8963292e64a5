//! Section workflow.
//!
//! A section wraps one grid with the actions a host offers around it:
//! switching into edit mode and saving or cancelling, picking rows into a
//! package, deleting selected rows, and showing or clearing filters.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::column::Column;
use crate::controller::{GridController, GridOptions};
use crate::error::SectionError;
use crate::model::{Dataset, Record};
use crate::style::CellStyleHook;

/// What the section is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionMode {
    /// Viewing; rows can be selected and deleted.
    #[default]
    Browse,
    /// Cells are editors; selection is off.
    Editing,
    /// Selected rows can be assigned to the package.
    Packaging,
}

impl fmt::Display for SectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SectionMode::Browse => "browsing",
            SectionMode::Editing => "editing",
            SectionMode::Packaging => "packaging",
        })
    }
}

/// Counters shown in the section toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCounts {
    pub filtered: usize,
    pub total: usize,
    pub selected: usize,
}

/// A titled grid with its editing and packaging workflow.
///
/// # Example
///
/// ```
/// use editgrid_lib::column::Column;
/// use editgrid_lib::model::{Dataset, Record};
/// use editgrid_lib::section::{Section, SectionMode};
///
/// let dataset = Dataset::new(vec![Record::new("p-1").set("age", 25i64)]).unwrap();
/// let mut section = Section::new("People", dataset, vec![Column::new("age", "Age")]);
///
/// section.toggle_edit().unwrap();
/// section.grid_mut().edit_cell("p-1", "age", "31").unwrap();
/// assert!(section.has_unsaved_changes());
///
/// section.save().unwrap();
/// assert_eq!(section.mode(), SectionMode::Browse);
/// assert!(!section.has_unsaved_changes());
/// ```
pub struct Section {
    title: String,
    grid: GridController,
    mode: SectionMode,
    read_only: bool,
    filters_visible: bool,
    package: Vec<Arc<Record>>,
}

impl Section {
    /// Creates an editable section.
    pub fn new(title: impl Into<String>, dataset: Dataset, columns: Vec<Column>) -> Self {
        Self::with_options(title, dataset, columns, GridOptions::default())
    }

    /// Creates an editable section with custom grid options.
    pub fn with_options(
        title: impl Into<String>,
        dataset: Dataset,
        columns: Vec<Column>,
        options: GridOptions,
    ) -> Self {
        let options = options.editing(false).selecting(false);
        Self {
            title: title.into(),
            grid: GridController::new(dataset, columns, options),
            mode: SectionMode::Browse,
            read_only: false,
            filters_visible: true,
            package: Vec::new(),
        }
    }

    /// Creates a display-only section: no editing, no selection.
    pub fn read_only(title: impl Into<String>, dataset: Dataset, columns: Vec<Column>) -> Self {
        Self::read_only_with_options(title, dataset, columns, GridOptions::read_only())
    }

    /// Creates a display-only section with custom grid geometry.
    pub fn read_only_with_options(
        title: impl Into<String>,
        dataset: Dataset,
        columns: Vec<Column>,
        options: GridOptions,
    ) -> Self {
        let options = options
            .editing(false)
            .selection(false)
            .checkbox(false)
            .selecting(false);
        Self {
            title: title.into(),
            grid: GridController::new(dataset, columns, options),
            mode: SectionMode::Browse,
            read_only: true,
            filters_visible: true,
            package: Vec::new(),
        }
    }

    /// Attaches a per-cell style hook to the grid.
    pub fn with_style_hook(mut self, hook: impl CellStyleHook + 'static) -> Self {
        self.grid = self.grid.with_style_hook(hook);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> SectionMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn grid(&self) -> &GridController {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridController {
        &mut self.grid
    }

    /// Records assigned so far, in assignment order.
    pub fn package(&self) -> &[Arc<Record>] {
        &self.package
    }

    fn require(&self, action: &'static str, mode: SectionMode) -> Result<(), SectionError> {
        if self.read_only {
            return Err(SectionError::ReadOnly);
        }
        if self.mode != mode {
            return Err(SectionError::WrongMode {
                action,
                mode: self.mode,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Enters edit mode, or cancels it when already editing.
    pub fn toggle_edit(&mut self) -> Result<(), SectionError> {
        if self.mode == SectionMode::Editing {
            return self.cancel_edit();
        }
        self.require("edit", SectionMode::Browse)?;
        self.grid.set_editing(true);
        self.grid.set_selection_enabled(false);
        self.grid.set_show_checkbox(false);
        self.mode = SectionMode::Editing;
        debug!("{}: edit mode", self.title);
        Ok(())
    }

    /// Commits pending edits into the dataset and leaves edit mode.
    pub fn save(&mut self) -> Result<(), SectionError> {
        self.require("save", SectionMode::Editing)?;
        self.grid.commit_edits();
        self.leave_edit();
        debug!("{}: saved", self.title);
        Ok(())
    }

    /// Discards pending edits and leaves edit mode.
    pub fn cancel_edit(&mut self) -> Result<(), SectionError> {
        self.require("cancel editing", SectionMode::Editing)?;
        self.grid.discard_edits();
        self.leave_edit();
        debug!("{}: edit cancelled", self.title);
        Ok(())
    }

    fn leave_edit(&mut self) {
        self.grid.set_editing(false);
        self.grid.set_selection_enabled(true);
        self.grid.set_show_checkbox(true);
        self.mode = SectionMode::Browse;
    }

    /// Whether edit mode holds edits that are not saved.
    pub fn has_unsaved_changes(&self) -> bool {
        self.mode == SectionMode::Editing && !self.grid.dirty().is_empty()
    }

    // =========================================================================
    // Packaging
    // =========================================================================

    /// Enters or leaves package picking mode.
    pub fn toggle_packaging(&mut self) -> Result<(), SectionError> {
        let next = match self.mode {
            SectionMode::Packaging => SectionMode::Browse,
            _ => {
                self.require("package", SectionMode::Browse)?;
                SectionMode::Packaging
            }
        };
        self.grid.set_selecting(next == SectionMode::Packaging);
        self.mode = next;
        debug!("{}: {}", self.title, next);
        Ok(())
    }

    /// Appends the selected records, in dataset order, to the package and
    /// clears the selection. Returns how many were assigned.
    pub fn assign(&mut self) -> Result<usize, SectionError> {
        self.require("assign", SectionMode::Packaging)?;
        if self.grid.selected_count() == 0 {
            return Err(SectionError::NothingSelected);
        }
        let records = self.grid.selected_records();
        let assigned = records.len();
        self.package.extend(records);
        self.grid.clear_selection();
        debug!("{}: assigned {} record(s)", self.title, assigned);
        Ok(assigned)
    }

    // =========================================================================
    // Rows and filters
    // =========================================================================

    /// Removes the selected rows and drops every pending edit.
    pub fn delete_selected(&mut self) -> Result<usize, SectionError> {
        self.require("delete", SectionMode::Browse)?;
        if self.grid.selected_count() == 0 {
            return Err(SectionError::NothingSelected);
        }
        let removed = self.grid.delete_selected();
        self.grid.discard_edits();
        Ok(removed)
    }

    /// Shows or hides the filter row.
    pub fn toggle_filters(&mut self) {
        self.filters_visible = !self.filters_visible;
    }

    pub fn filters_visible(&self) -> bool {
        self.filters_visible
    }

    pub fn clear_filters(&mut self) {
        self.grid.clear_filters();
    }

    pub fn counts(&self) -> SectionCounts {
        SectionCounts {
            filtered: self.grid.filtered_count(),
            total: self.grid.total_count(),
            selected: self.grid.selected_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn section() -> Section {
        let records = (1..=5)
            .map(|i| {
                Record::new(format!("p-{i}"))
                    .set("id", format!("p-{i}"))
                    .set("age", 20 + i as i64 * 5)
            })
            .collect();
        Section::new(
            "People",
            Dataset::new(records).unwrap(),
            vec![
                Column::new("id", "ID").read_only().hide_while_selecting(),
                Column::new("age", "Age"),
            ],
        )
    }

    #[test]
    fn test_edit_and_packaging_exclude_each_other() {
        let mut section = section();
        section.toggle_edit().unwrap();
        assert_eq!(
            section.toggle_packaging(),
            Err(SectionError::WrongMode {
                action: "package",
                mode: SectionMode::Editing
            })
        );
        section.toggle_edit().unwrap();
        assert_eq!(section.mode(), SectionMode::Browse);

        section.toggle_packaging().unwrap();
        assert!(matches!(
            section.toggle_edit(),
            Err(SectionError::WrongMode { .. })
        ));
        assert_eq!(section.grid().visible_columns().len(), 1);
    }

    #[test]
    fn test_edit_mode_disables_selection() {
        let mut section = section();
        section.toggle_edit().unwrap();
        assert!(!section.grid().checkbox_visible());
        assert_eq!(
            section.grid_mut().toggle_row("p-1"),
            Err(GridError::SelectionDisabled)
        );
    }

    #[test]
    fn test_cancel_discards() {
        let mut section = section();
        section.toggle_edit().unwrap();
        section.grid_mut().edit_cell("p-1", "age", "99").unwrap();
        section.cancel_edit().unwrap();
        assert!(section.grid().dirty().is_empty());
        assert_eq!(
            section.grid().dataset().find("p-1").unwrap().get("age"),
            Some(&25i64.into())
        );
    }

    #[test]
    fn test_assign_moves_selection_into_package() {
        let mut section = section();
        section.toggle_packaging().unwrap();
        assert_eq!(section.assign(), Err(SectionError::NothingSelected));

        section.grid_mut().toggle_row("p-4").unwrap();
        section.grid_mut().toggle_row("p-2").unwrap();
        assert_eq!(section.assign(), Ok(2));
        assert_eq!(section.counts().selected, 0);
        let ids: Vec<&str> = section.package().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["p-2", "p-4"]);

        section.grid_mut().toggle_row("p-1").unwrap();
        section.assign().unwrap();
        assert_eq!(section.package().len(), 3);
    }

    #[test]
    fn test_delete_only_while_browsing() {
        let mut section = section();
        section.grid_mut().toggle_row("p-1").unwrap();
        section.toggle_packaging().unwrap();
        assert!(section.delete_selected().is_err());
        section.toggle_packaging().unwrap();

        assert_eq!(section.delete_selected(), Ok(1));
        assert_eq!(
            section.counts(),
            SectionCounts {
                filtered: 4,
                total: 4,
                selected: 0
            }
        );
    }

    #[test]
    fn test_read_only_section() {
        let dataset = Dataset::new(vec![Record::new("1").set("name", "x")]).unwrap();
        let mut section = Section::read_only("Catalog", dataset, vec![Column::new("name", "Name")]);
        assert_eq!(section.toggle_edit(), Err(SectionError::ReadOnly));
        assert_eq!(section.toggle_packaging(), Err(SectionError::ReadOnly));
        assert!(section.grid_mut().toggle_row("1").is_err());

        section.toggle_filters();
        assert!(!section.filters_visible());
    }
}
