//! Read-only catalog section.

use editgrid_lib::column::{CellFormat, Column, ColumnKind};

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").width(7),
        Column::new("firstName", "First Name").width(12),
        Column::new("lastName", "Last Name").width(12),
        Column::new("age", "Age").width(6).kind(ColumnKind::Number),
        Column::new("visits", "Visits").width(8).kind(ColumnKind::Number),
        Column::new("status", "Status").width(14),
        Column::new("progress", "Progress").width(10).kind(ColumnKind::Number),
        Column::new("createdAt", "Created")
            .width(12)
            .kind(ColumnKind::Date)
            .format(CellFormat::date()),
    ]
}
