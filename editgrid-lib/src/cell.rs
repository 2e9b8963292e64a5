//! Cell rendering.
//!
//! Stateless mapping from a resolved value to what the host paints: either
//! display text or an editor that reports raw changes.

use crate::column::CellFormat;
use crate::model::Value;

/// Whether a cell is shown or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellMode {
    #[default]
    Display,
    Edit,
}

/// A raw edit produced by a cell editor.
///
/// The text is not validated; interpretation happens when the controller
/// applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub row_id: String,
    pub column_id: String,
    pub raw: String,
}

/// Editor state for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEditor {
    pub row_id: String,
    pub column_id: String,
    /// Text the editor starts with.
    pub text: String,
    /// Whether the cell already holds a pending edit.
    pub dirty: bool,
}

impl CellEditor {
    /// Produces the edit for new editor text.
    pub fn change(&self, raw: impl Into<String>) -> CellEdit {
        CellEdit {
            row_id: self.row_id.clone(),
            column_id: self.column_id.clone(),
            raw: raw.into(),
        }
    }
}

/// Render output for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Display { text: String, dirty: bool },
    Editor(CellEditor),
}

impl CellView {
    /// Text shown for the cell in either mode.
    pub fn text(&self) -> &str {
        match self {
            CellView::Display { text, .. } => text,
            CellView::Editor(editor) => &editor.text,
        }
    }

    /// Whether the cell holds a pending edit.
    pub fn is_dirty(&self) -> bool {
        match self {
            CellView::Display { dirty, .. } => *dirty,
            CellView::Editor(editor) => editor.dirty,
        }
    }
}

/// Display string for a value.
///
/// Null is empty. A column format applies to non-null values; without one,
/// dates use the default local format and everything else string coercion.
pub fn display_text(value: &Value, format: Option<&CellFormat>) -> String {
    match format {
        Some(f) if !value.is_null() => f.format(value),
        _ => value.to_string(),
    }
}

/// Renders one cell.
pub fn render_cell(
    row_id: &str,
    column_id: &str,
    value: &Value,
    mode: CellMode,
    dirty: bool,
    format: Option<&CellFormat>,
) -> CellView {
    match mode {
        CellMode::Display => CellView::Display {
            text: display_text(value, format),
            dirty,
        },
        CellMode::Edit => CellView::Editor(CellEditor {
            row_id: row_id.to_string(),
            column_id: column_id.to_string(),
            text: value.to_string(),
            dirty,
        }),
    }
}
