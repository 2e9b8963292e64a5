//! Grid controller.
//!
//! Owns the dataset snapshot, the overlays, the filter and sort configuration
//! and the scroll state. Every mutation rederives the row view top-down and
//! notifies subscribers when the filtered or selected count changes.

use std::sync::Arc;

use log::{debug, trace};

use crate::cell::{CellEdit, CellMode, CellView, render_cell};
use crate::column::{Column, ColumnKind, ColumnLayout};
use crate::error::GridError;
use crate::model::{Dataset, Record, Value};
use crate::overlay::{DirtyOverlay, SelectionSet, SelectionState};
use crate::query::{
    ColumnFilter, Committed, FilterPolicy, FilterSpec, RowView, SortSpec, compute_view,
};
use crate::style::{CellStyleHook, StyleTag};
use crate::viewport::{
    DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT, FixedSize, ItemSizes,
    ScrollState, ViewportWindow, compute_window,
};

static NULL: Value = Value::Null;

/// Default width of the selection checkbox column.
pub const DEFAULT_CHECKBOX_WIDTH: u16 = 36;

/// Grid behaviour and geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Cells render as editors and accept edits.
    pub editing_enabled: bool,
    /// Rows can be selected.
    pub selection_enabled: bool,
    /// The checkbox column is shown while selection is enabled.
    pub show_checkbox: bool,
    /// Rows are being picked for a package; columns marked
    /// `hidden_while_selecting` are hidden.
    pub selecting: bool,
    /// Which values filters and sorting look at.
    pub filter_policy: FilterPolicy,
    /// Row height estimate.
    pub row_height: u64,
    /// Rows rendered beyond each viewport edge.
    pub overscan: usize,
    /// Initial viewport height.
    pub viewport_height: u64,
    /// Width of the checkbox column.
    pub checkbox_width: u16,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            editing_enabled: false,
            selection_enabled: true,
            show_checkbox: true,
            selecting: false,
            filter_policy: FilterPolicy::default(),
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            checkbox_width: DEFAULT_CHECKBOX_WIDTH,
        }
    }
}

impl GridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a grid that can neither edit nor select.
    pub fn read_only() -> Self {
        Self {
            selection_enabled: false,
            show_checkbox: false,
            ..Self::default()
        }
    }

    pub fn editing(mut self, enabled: bool) -> Self {
        self.editing_enabled = enabled;
        self
    }

    pub fn selection(mut self, enabled: bool) -> Self {
        self.selection_enabled = enabled;
        self
    }

    pub fn checkbox(mut self, show: bool) -> Self {
        self.show_checkbox = show;
        self
    }

    pub fn selecting(mut self, selecting: bool) -> Self {
        self.selecting = selecting;
        self
    }

    pub fn filter_policy(mut self, policy: FilterPolicy) -> Self {
        self.filter_policy = policy;
        self
    }

    pub fn row_height(mut self, height: u64) -> Self {
        self.row_height = height;
        self
    }

    pub fn overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }

    pub fn viewport_height(mut self, height: u64) -> Self {
        self.viewport_height = height;
        self
    }

    pub fn checkbox_width(mut self, width: u16) -> Self {
        self.checkbox_width = width;
        self
    }
}

/// Change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// Number of rows passing the filters.
    FilteredCountChanged(usize),
    /// Number of selected rows.
    SelectedCountChanged(usize),
}

/// Subscriber callback.
pub type GridListener = Box<dyn FnMut(&GridEvent)>;

/// One cell of an effective row.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveCell {
    pub column_id: String,
    /// Pending edit if any, otherwise the committed value.
    pub value: Value,
    pub dirty: bool,
    pub style: Option<StyleTag>,
    pub view: CellView,
}

/// A visible row with overlays merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRow {
    /// Position in the filtered, sorted view.
    pub view_index: usize,
    /// Committed record.
    pub record: Arc<Record>,
    pub selected: bool,
    /// Alternating background parity.
    pub striped: bool,
    /// Cells for the visible columns, in layout order.
    pub cells: Vec<EffectiveCell>,
}

impl EffectiveRow {
    pub fn id(&self) -> &str {
        self.record.id()
    }

    /// Cell for a column id.
    pub fn cell(&self, column_id: &str) -> Option<&EffectiveCell> {
        self.cells.iter().find(|c| c.column_id == column_id)
    }
}

/// The window and the rows inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSlice {
    pub window: ViewportWindow,
    pub rows: Vec<EffectiveRow>,
}

/// Virtualized editable grid over a dataset.
///
/// # Example
///
/// ```
/// use editgrid_lib::{GridController, GridOptions};
/// use editgrid_lib::column::Column;
/// use editgrid_lib::model::{Dataset, Record};
/// use editgrid_lib::query::ColumnFilter;
///
/// let dataset = Dataset::new(
///     [25i64, 31, 33, 40, 45]
///         .iter()
///         .enumerate()
///         .map(|(i, age)| Record::new(format!("p-{}", i + 1)).set("age", *age))
///         .collect(),
/// )
/// .unwrap();
///
/// let columns = vec![Column::new("age", "Age")];
/// let mut grid = GridController::new(dataset, columns, GridOptions::default());
/// grid.set_filter("age", ColumnFilter::range(Some(30.0), Some(39.0)));
/// assert_eq!(grid.filtered_count(), 2);
/// ```
pub struct GridController {
    dataset: Dataset,
    columns: Vec<Column>,
    options: GridOptions,
    filters: FilterSpec,
    sort: SortSpec,
    dirty: DirtyOverlay,
    selection: SelectionSet,
    view: RowView,
    scroll: ScrollState,
    style_hook: Option<Box<dyn CellStyleHook>>,
    listeners: Vec<GridListener>,
    last_filtered: usize,
    last_selected: usize,
}

impl GridController {
    /// Creates a controller and derives the initial view.
    pub fn new(dataset: Dataset, columns: Vec<Column>, options: GridOptions) -> Self {
        let scroll = ScrollState::new(options.viewport_height);
        let mut grid = Self {
            dataset,
            columns,
            options,
            filters: FilterSpec::new(),
            sort: SortSpec::none(),
            dirty: DirtyOverlay::new(),
            selection: SelectionSet::new(),
            view: RowView::default(),
            scroll,
            style_hook: None,
            listeners: Vec::new(),
            last_filtered: 0,
            last_selected: 0,
        };
        grid.rederive();
        grid.last_filtered = grid.view.len();
        grid
    }

    /// Installs a cell style hook.
    pub fn with_style_hook(mut self, hook: impl CellStyleHook + 'static) -> Self {
        self.style_hook = Some(Box::new(hook));
        self
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn dirty(&self) -> &DirtyOverlay {
        &self.dirty
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn view(&self) -> &RowView {
        &self.view
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// Rows passing the filters.
    pub fn filtered_count(&self) -> usize {
        self.view.len()
    }

    /// Selected rows, regardless of filters.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Rows in the dataset.
    pub fn total_count(&self) -> usize {
        self.dataset.len()
    }

    /// Ids of the filtered rows in view order.
    pub fn filtered_ids(&self) -> impl Iterator<Item = &str> {
        self.view.ids(&self.dataset)
    }

    /// Selected committed records in dataset order.
    pub fn selected_records(&self) -> Vec<Arc<Record>> {
        (0..self.dataset.len())
            .filter_map(|p| self.dataset.shared(p))
            .filter(|r| self.selection.is_selected(r.id()))
            .cloned()
            .collect()
    }

    /// Value of a cell with pending edits applied. Missing fields are null.
    pub fn effective_value(&self, row_id: &str, column_id: &str) -> &Value {
        let base = self.dataset.find(row_id).and_then(|r| r.get(column_id));
        self.dirty
            .effective_value(row_id, column_id, base)
            .unwrap_or(&NULL)
    }

    /// Kind of a column, declared or inferred from the first record.
    pub fn column_kind(&self, column_id: &str) -> ColumnKind {
        let first = self.dataset.get(0);
        match self.column(column_id) {
            Some(column) => column.resolved_kind(first),
            None => ColumnKind::infer(first.and_then(|r| r.get(column_id))),
        }
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Whether the checkbox column is shown.
    pub fn checkbox_visible(&self) -> bool {
        self.options.selection_enabled && self.options.show_checkbox
    }

    /// Positions of the visible columns.
    pub fn column_layout(&self) -> ColumnLayout {
        let checkbox_width = if self.checkbox_visible() {
            self.options.checkbox_width
        } else {
            0
        };
        ColumnLayout::compute(&self.columns, self.options.selecting, checkbox_width)
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.column_layout()
            .slots
            .iter()
            .filter_map(|slot| self.columns.get(slot.index))
            .collect()
    }

    // =========================================================================
    // Modes
    // =========================================================================

    /// Turns edit mode on or off. Pending edits are kept.
    pub fn set_editing(&mut self, enabled: bool) {
        self.options.editing_enabled = enabled;
    }

    /// Turns selection on or off. The current selection is kept.
    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.options.selection_enabled = enabled;
    }

    pub fn set_show_checkbox(&mut self, show: bool) {
        self.options.show_checkbox = show;
    }

    /// Enters or leaves package picking mode.
    pub fn set_selecting(&mut self, selecting: bool) {
        self.options.selecting = selecting;
    }

    pub fn set_filter_policy(&mut self, policy: FilterPolicy) {
        if self.options.filter_policy != policy {
            self.options.filter_policy = policy;
            self.refresh();
        }
    }

    // =========================================================================
    // Filters and sorting
    // =========================================================================

    /// Sets or replaces a column filter. Inactive filters remove the entry.
    pub fn set_filter(&mut self, column_id: &str, filter: ColumnFilter) {
        if self.filters.set(column_id, filter) {
            debug!("Filter on '{}' set to {:?}", column_id, self.filters.get(column_id));
            self.refresh();
        }
    }

    /// Sets a range filter from raw min/max input text.
    pub fn set_range_filter_input(&mut self, column_id: &str, min: &str, max: &str) {
        self.set_filter(column_id, ColumnFilter::range_input(min, max));
    }

    /// Sets a substring filter.
    pub fn set_text_filter(&mut self, column_id: &str, pattern: &str) {
        self.set_filter(column_id, ColumnFilter::contains(pattern));
    }

    /// Removes a single column filter.
    pub fn remove_filter(&mut self, column_id: &str) {
        if self.filters.remove(column_id) {
            debug!("Filter on '{}' removed", column_id);
            self.refresh();
        }
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        if self.filters.clear() {
            debug!("Filters cleared");
            self.refresh();
        }
    }

    /// Advances the sort cycle of a column.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<(), GridError> {
        let column = self
            .column(column_id)
            .ok_or_else(|| GridError::UnknownColumn(column_id.to_string()))?;
        if !column.sortable {
            return Ok(());
        }
        self.sort = self.sort.cycle(column_id);
        debug!("Sort is now {:?}", self.sort.active());
        self.refresh();
        Ok(())
    }

    /// Replaces the sort.
    pub fn set_sort(&mut self, sort: SortSpec) {
        if self.sort != sort {
            self.sort = sort;
            self.refresh();
        }
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Records a pending edit from raw editor text.
    ///
    /// The text is interpreted by column kind before entering the overlay.
    pub fn edit_cell(&mut self, row_id: &str, column_id: &str, raw: &str) -> Result<(), GridError> {
        if !self.options.editing_enabled {
            return Err(GridError::EditingDisabled);
        }
        if !self.dataset.contains(row_id) {
            return Err(GridError::UnknownRow(row_id.to_string()));
        }
        if !self.dataset.has_field(column_id) {
            return Err(GridError::UnknownColumn(column_id.to_string()));
        }
        if self.column(column_id).is_some_and(|c| !c.editable) {
            return Err(GridError::ReadOnlyColumn(column_id.to_string()));
        }

        let format = self.column(column_id).and_then(|c| c.format.as_ref());
        let value = self.column_kind(column_id).interpret(raw, format);
        trace!("Edit {}.{} = {:?}", row_id, column_id, value);
        self.dirty.set_cell(row_id, column_id, value);

        if self.options.filter_policy == FilterPolicy::EffectiveValues {
            self.refresh();
        }
        Ok(())
    }

    /// Applies an edit produced by a cell editor.
    pub fn apply_edit(&mut self, edit: &CellEdit) -> Result<(), GridError> {
        self.edit_cell(&edit.row_id, &edit.column_id, &edit.raw)
    }

    /// Folds pending edits into the dataset.
    pub fn commit_edits(&mut self) {
        if self.dirty.is_empty() {
            return;
        }
        self.dataset = self.dirty.commit(&self.dataset);
        self.dirty.discard();
        self.refresh();
    }

    /// Drops pending edits.
    pub fn discard_edits(&mut self) {
        if self.dirty.is_empty() {
            return;
        }
        self.dirty.discard();
        if self.options.filter_policy == FilterPolicy::EffectiveValues {
            self.refresh();
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Flips selection of a row. Returns the new state.
    pub fn toggle_row(&mut self, row_id: &str) -> Result<bool, GridError> {
        if !self.options.selection_enabled {
            return Err(GridError::SelectionDisabled);
        }
        if !self.dataset.contains(row_id) {
            return Err(GridError::UnknownRow(row_id.to_string()));
        }
        let selected = self.selection.toggle(row_id);
        self.notify();
        Ok(selected)
    }

    /// Header checkbox: selects every filtered row, or clears them when all
    /// of them are already selected.
    pub fn toggle_all(&mut self) -> Result<(), GridError> {
        if !self.options.selection_enabled {
            return Err(GridError::SelectionDisabled);
        }
        let value = self.header_selection() != SelectionState::All;
        self.selection.set_all(self.view.ids(&self.dataset), value);
        self.notify();
        Ok(())
    }

    /// Tri-state of the header checkbox over the filtered rows.
    pub fn header_selection(&self) -> SelectionState {
        self.selection.state(self.view.ids(&self.dataset))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify();
    }

    // =========================================================================
    // Dataset
    // =========================================================================

    /// Replaces the dataset.
    ///
    /// Selections and pending edits for rows that no longer exist are dropped.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let gone: Vec<String> = self
            .selection
            .selected_ids()
            .chain(self.dirty.edited_rows())
            .filter(|id| !dataset.contains(id))
            .map(String::from)
            .collect();
        if !gone.is_empty() {
            self.selection.set_all(gone.iter().map(|s| s.as_str()), false);
            self.dirty.remove_rows(gone.iter().map(|s| s.as_str()));
        }
        self.dataset = dataset;
        self.refresh();
    }

    /// Removes the selected rows. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let selection = self.selection.clone();
        let before = self.dataset.len();
        self.dataset = self.dataset.retain(|r| !selection.is_selected(r.id()));
        self.dirty.remove_rows(selection.selected_ids());
        self.selection.clear();
        let removed = before - self.dataset.len();
        debug!("Deleted {} row(s)", removed);
        self.refresh();
        removed
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    fn sizes(&self) -> FixedSize {
        FixedSize::new(self.view.len(), self.options.row_height)
    }

    pub fn scroll_by(&mut self, delta: i64) {
        self.scroll.scroll_by(delta);
    }

    pub fn scroll_to(&mut self, offset: u64) {
        self.scroll.scroll_to(offset);
    }

    pub fn scroll_into_view(&mut self, view_index: usize) {
        self.scroll.scroll_into_view(view_index);
    }

    pub fn page_up(&mut self) {
        self.scroll.page_up();
    }

    pub fn page_down(&mut self) {
        self.scroll.page_down();
    }

    pub fn scroll_home(&mut self) {
        self.scroll.home();
    }

    pub fn scroll_end(&mut self) {
        self.scroll.end();
    }

    /// Updates the viewport height.
    pub fn set_viewport(&mut self, height: u64) {
        self.scroll.set_viewport(height);
    }

    /// View index of the row at a y-offset from the top of the viewport.
    pub fn row_at_y(&self, y: u64) -> Option<usize> {
        let sizes = self.sizes();
        if sizes.count() == 0 {
            return None;
        }
        let offset = self.scroll.offset.saturating_add(y);
        (offset < sizes.total_height()).then(|| sizes.index_at(offset))
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Applies pending scroll requests, then materializes the visible rows.
    pub fn visible_rows(&mut self) -> VisibleSlice {
        let sizes = self.sizes();
        self.scroll.process_requests(&sizes);
        let window = compute_window(
            &sizes,
            self.scroll.offset,
            self.scroll.viewport,
            self.options.overscan,
        );

        let columns = self.visible_columns();
        let mode = if self.options.editing_enabled {
            CellMode::Edit
        } else {
            CellMode::Display
        };

        let rows = window
            .range()
            .filter_map(|view_index| {
                let record = self.dataset.shared(self.view.position(view_index)?)?;
                let cells = columns
                    .iter()
                    .map(|column| self.effective_cell(record, column, mode))
                    .collect();
                Some(EffectiveRow {
                    view_index,
                    record: Arc::clone(record),
                    selected: self.selection.is_selected(record.id()),
                    striped: view_index % 2 == 1,
                    cells,
                })
            })
            .collect();

        VisibleSlice { window, rows }
    }

    fn effective_cell(&self, record: &Record, column: &Column, mode: CellMode) -> EffectiveCell {
        let id = record.id();
        let value = self
            .dirty
            .effective_value(id, &column.id, record.get(&column.id))
            .unwrap_or(&NULL);
        let dirty = self.dirty.is_dirty(id, &column.id);
        let mode = if column.editable { mode } else { CellMode::Display };
        EffectiveCell {
            column_id: column.id.clone(),
            value: value.clone(),
            dirty,
            style: self
                .style_hook
                .as_ref()
                .and_then(|hook| hook.style(record, &column.id, value)),
            view: render_cell(id, &column.id, value, mode, dirty, column.format.as_ref()),
        }
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    fn rederive(&mut self) {
        self.view = match self.options.filter_policy {
            FilterPolicy::EffectiveValues => compute_view(
                &self.dataset,
                &self.columns,
                &self.filters,
                &self.sort,
                &self.dirty,
            ),
            FilterPolicy::Committed => compute_view(
                &self.dataset,
                &self.columns,
                &self.filters,
                &self.sort,
                &Committed,
            ),
        };
        self.scroll.set_content_height(self.sizes().total_height());
    }

    fn refresh(&mut self) {
        self.rederive();
        self.notify();
    }

    fn notify(&mut self) {
        let filtered = self.view.len();
        let selected = self.selection.len();
        let mut events = Vec::new();
        if filtered != self.last_filtered {
            self.last_filtered = filtered;
            events.push(GridEvent::FilteredCountChanged(filtered));
        }
        if selected != self.last_selected {
            self.last_selected = selected;
            events.push(GridEvent::SelectedCountChanged(selected));
        }
        for event in &events {
            trace!("Emitting {:?}", event);
            for listener in &mut self.listeners {
                listener(event);
            }
        }
    }
}
