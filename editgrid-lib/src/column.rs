//! Column definitions and layout.

use std::fmt;
use std::sync::Arc;

use chrono::Local;

use crate::model::{DEFAULT_DATE_FORMAT, Record, Value, parse_datetime, parse_number};

/// Default width of a data column.
pub const DEFAULT_COLUMN_WIDTH: u16 = 150;

/// What kind of values a column holds.
///
/// The kind decides which filter editor applies (range vs. text), how values
/// compare when sorting, and how raw edited text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text and enum-like strings.
    Text,
    /// Integers, floats and decimals.
    Number,
    /// Points in time.
    Date,
}

impl ColumnKind {
    /// Infers the kind from a sample value.
    pub fn infer(sample: Option<&Value>) -> Self {
        match sample {
            Some(v) if v.is_number() => ColumnKind::Number,
            Some(Value::DateTime(_)) => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }

    /// Interprets raw edited text for this kind of column.
    ///
    /// Number columns store parseable text as a number. Date columns store
    /// text that parses as a date, trying the column's own date pattern
    /// before the default ones. Anything else, and text that does not parse,
    /// is kept as the raw string.
    pub fn interpret(&self, raw: &str, format: Option<&CellFormat>) -> Value {
        match self {
            ColumnKind::Number => match parse_number(raw) {
                Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                    Value::Int(n as i64)
                }
                Some(n) => Value::Float(n),
                None => Value::String(raw.to_string()),
            },
            ColumnKind::Date => {
                let pattern = match format {
                    Some(CellFormat::Date(pattern)) => Some(pattern.as_str()),
                    _ => None,
                };
                match parse_datetime(raw, pattern) {
                    Some(dt) => Value::DateTime(dt),
                    None => Value::String(raw.to_string()),
                }
            }
            ColumnKind::Text => Value::String(raw.to_string()),
        }
    }
}

/// Custom display formatting for a column.
#[derive(Clone)]
pub enum CellFormat {
    /// Dates in local time with a chrono format string.
    Date(String),
    /// Arbitrary formatting function.
    Custom(Arc<dyn Fn(&Value) -> String + Send + Sync>),
}

impl CellFormat {
    /// Date-only formatting (`2024/05/03`).
    pub fn date() -> Self {
        CellFormat::Date(DEFAULT_DATE_FORMAT.into())
    }

    /// Formats a value. Values that do not fit the format fall back to
    /// string coercion.
    pub fn format(&self, value: &Value) -> String {
        match self {
            CellFormat::Date(pattern) => match value.as_datetime() {
                Some(dt) => dt.with_timezone(&Local).format(pattern).to_string(),
                None => value.to_string(),
            },
            CellFormat::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for CellFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellFormat::Date(pattern) => f.debug_tuple("Date").field(pattern).finish(),
            CellFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A grid column definition.
#[derive(Clone, Debug)]
pub struct Column {
    /// Field name this column reads; also its unique identifier.
    pub id: String,
    /// Header text.
    pub header: String,
    /// Declared value kind. `None` means inferred from the data.
    pub kind: Option<ColumnKind>,
    /// Optional display formatting.
    pub format: Option<CellFormat>,
    /// Width in host units.
    pub width: u16,
    /// Whether a filter editor is offered.
    pub filterable: bool,
    /// Whether clicking the header cycles sorting.
    pub sortable: bool,
    /// Whether cells accept edits in edit mode.
    pub editable: bool,
    /// Hidden while the selection (package) column is shown.
    pub hidden_while_selecting: bool,
}

impl Column {
    /// Create a new column for a field.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            kind: None,
            format: None,
            width: DEFAULT_COLUMN_WIDTH,
            filterable: true,
            sortable: true,
            editable: true,
            hidden_while_selecting: false,
        }
    }

    /// Declare the value kind.
    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the display format.
    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set a fixed width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Disable filtering.
    pub fn no_filter(mut self) -> Self {
        self.filterable = false;
        self
    }

    /// Disable sorting.
    pub fn no_sort(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Keep cells read-only in edit mode.
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Hide this column while rows are being picked for a package.
    pub fn hide_while_selecting(mut self) -> Self {
        self.hidden_while_selecting = true;
        self
    }

    /// Resolves the kind, inferring from the first record if undeclared.
    pub fn resolved_kind(&self, first: Option<&Record>) -> ColumnKind {
        self.kind
            .unwrap_or_else(|| ColumnKind::infer(first.and_then(|r| r.get(&self.id))))
    }
}

/// Horizontal placement of one visible column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    /// Index into the configured column list.
    pub index: usize,
    /// Left edge.
    pub x: u16,
    /// Width.
    pub width: u16,
}

/// Visible columns and their x-positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Width reserved for the selection checkbox column, 0 when hidden.
    pub checkbox_width: u16,
    /// Visible data columns in display order.
    pub slots: Vec<ColumnSlot>,
}

impl ColumnLayout {
    /// Calculate positions for the visible columns.
    ///
    /// `checkbox_width` is 0 when no checkbox column is shown. While
    /// `selecting`, columns marked `hidden_while_selecting` are skipped.
    pub fn compute(columns: &[Column], selecting: bool, checkbox_width: u16) -> Self {
        let mut x = checkbox_width;
        let mut slots = Vec::with_capacity(columns.len());
        for (index, col) in columns.iter().enumerate() {
            if selecting && col.hidden_while_selecting {
                continue;
            }
            slots.push(ColumnSlot {
                index,
                x,
                width: col.width,
            });
            x = x.saturating_add(col.width);
        }
        Self {
            checkbox_width,
            slots,
        }
    }

    /// Total width including the checkbox column.
    pub fn total_width(&self) -> u16 {
        self.slots
            .last()
            .map(|s| s.x.saturating_add(s.width))
            .unwrap_or(self.checkbox_width)
    }

    /// Find which visible slot covers an x-coordinate.
    pub fn slot_at_x(&self, x: u16) -> Option<&ColumnSlot> {
        if x < self.checkbox_width {
            return None;
        }
        let i = self.slots.partition_point(|s| s.x <= x).checked_sub(1)?;
        let slot = &self.slots[i];
        (x < slot.x.saturating_add(slot.width)).then_some(slot)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID").width(10).hide_while_selecting(),
            Column::new("name", "Name").width(20),
            Column::new("age", "Age").width(5),
        ]
    }

    #[test]
    fn test_layout_positions() {
        let layout = ColumnLayout::compute(&columns(), false, 0);
        assert_eq!(layout.checkbox_width, 0);
        let xs: Vec<u16> = layout.slots.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![0, 10, 30]);
        assert_eq!(layout.total_width(), 35);

        let layout = ColumnLayout::compute(&columns(), false, 4);
        assert_eq!(layout.slots.len(), 3);
        assert_eq!(layout.slots[0].x, 4);
    }

    #[test]
    fn test_layout_hides_columns_while_selecting() {
        let layout = ColumnLayout::compute(&columns(), true, 4);
        assert_eq!(layout.checkbox_width, 4);
        let indices: Vec<usize> = layout.slots.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(layout.slots[0].x, 4);
        assert_eq!(layout.total_width(), 29);
    }

    #[test]
    fn test_slot_at_x() {
        let layout = ColumnLayout::compute(&columns(), true, 4);
        assert_eq!(layout.slot_at_x(2), None);
        assert_eq!(layout.slot_at_x(4).map(|s| s.index), Some(1));
        assert_eq!(layout.slot_at_x(24).map(|s| s.index), Some(2));
        assert_eq!(layout.slot_at_x(29), None);
    }

    #[test]
    fn test_infer_and_interpret() {
        assert_eq!(ColumnKind::infer(Some(&Value::Int(3))), ColumnKind::Number);
        assert_eq!(ColumnKind::infer(Some(&Value::from("x"))), ColumnKind::Text);
        assert_eq!(ColumnKind::infer(None), ColumnKind::Text);

        assert_eq!(ColumnKind::Number.interpret("31", None), Value::Int(31));
        assert_eq!(ColumnKind::Number.interpret("2.5", None), Value::Float(2.5));
        assert_eq!(ColumnKind::Number.interpret("abc", None), Value::from("abc"));
        assert_eq!(ColumnKind::Text.interpret("31", None), Value::from("31"));
    }

    #[test]
    fn test_interpret_date_text() {
        let midnight = Local
            .with_ymd_and_hms(2024, 1, 5, 0, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let dotted = CellFormat::Date("%d.%m.%Y".into());

        assert_eq!(
            ColumnKind::Date.interpret("2024/01/05", Some(&CellFormat::date())),
            Value::DateTime(midnight)
        );
        assert_eq!(
            ColumnKind::Date.interpret("05.01.2024", Some(&dotted)),
            Value::DateTime(midnight)
        );
        assert_eq!(
            ColumnKind::Date.interpret("2024/01/05 00:00:00", None),
            Value::DateTime(midnight)
        );
        assert_eq!(
            ColumnKind::Date.interpret("soon", Some(&dotted)),
            Value::from("soon")
        );
        assert_eq!(ColumnKind::Text.interpret("2024/01/05", None), Value::from("2024/01/05"));
    }
}
