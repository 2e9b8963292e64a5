//! Products section.

use editgrid_lib::column::{Column, ColumnKind};
use editgrid_lib::model::{Record, Value};
use editgrid_lib::style::StyleTag;

/// Style tag for items with no stock.
pub const OUT_OF_STOCK: &str = "out-of-stock";

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").width(10).read_only().hide_while_selecting(),
        Column::new("name", "Name").width(14),
        Column::new("price", "Price").width(8).kind(ColumnKind::Number),
        Column::new("stock", "Stock").width(7).kind(ColumnKind::Number),
        Column::new("category", "Category").width(10),
        Column::new("updatedAt", "Updated")
            .width(21)
            .kind(ColumnKind::Date)
            .hide_while_selecting(),
    ]
}

/// Flags a stock of zero.
pub fn style_cell(_: &Record, column_id: &str, value: &Value) -> Option<StyleTag> {
    (column_id == "stock" && value.is_number() && value.as_number() == Some(0.0))
        .then(|| StyleTag::from(OUT_OF_STOCK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_out_of_stock() {
        let record = Record::new("prd-1");
        let flagged = Some(StyleTag::from(OUT_OF_STOCK));
        assert_eq!(style_cell(&record, "stock", &Value::Int(0)), flagged);
        assert_eq!(style_cell(&record, "stock", &Value::Int(1)), None);
        assert_eq!(style_cell(&record, "stock", &Value::from("0")), None);
        assert_eq!(style_cell(&record, "price", &Value::Int(0)), None);
    }
}
