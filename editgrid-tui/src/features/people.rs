//! People section.

use editgrid_lib::column::{CellFormat, Column, ColumnKind};
use editgrid_lib::model::{Record, Value};
use editgrid_lib::style::StyleTag;

/// Style tag for ages in the thirties.
pub const AGE_THIRTIES: &str = "age-thirties";

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").width(8).read_only().hide_while_selecting(),
        Column::new("firstName", "First Name").width(12),
        Column::new("lastName", "Last Name").width(12),
        Column::new("age", "Age").width(6).kind(ColumnKind::Number),
        Column::new("visits", "Visits").width(8).kind(ColumnKind::Number),
        Column::new("status", "Status").width(14),
        Column::new("progress", "Progress")
            .width(10)
            .kind(ColumnKind::Number)
            .hide_while_selecting(),
        Column::new("createdAt", "Created")
            .width(12)
            .kind(ColumnKind::Date)
            .format(CellFormat::date())
            .hide_while_selecting(),
    ]
}

/// Highlights ages in `[30, 40)`.
pub fn style_cell(_: &Record, column_id: &str, value: &Value) -> Option<StyleTag> {
    if column_id != "age" || !value.is_number() {
        return None;
    }
    let age = value.as_number()?;
    (30.0..40.0).contains(&age).then(|| StyleTag::from(AGE_THIRTIES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_thirties() {
        let record = Record::new("p-1");
        let thirties = Some(StyleTag::from(AGE_THIRTIES));
        assert_eq!(style_cell(&record, "age", &Value::Int(30)), thirties);
        assert_eq!(style_cell(&record, "age", &Value::Float(39.5)), thirties);
        assert_eq!(style_cell(&record, "age", &Value::Int(40)), None);
        assert_eq!(style_cell(&record, "age", &Value::from("35")), None);
        assert_eq!(style_cell(&record, "visits", &Value::Int(35)), None);
    }

    #[test]
    fn test_only_id_is_read_only() {
        let locked: Vec<_> = columns()
            .into_iter()
            .filter(|c| !c.editable)
            .map(|c| c.id)
            .collect();
        assert_eq!(locked, vec!["id".to_string()]);
    }
}
