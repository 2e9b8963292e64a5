//! Synthetic demo records.

use chrono::{Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use editgrid_lib::model::Record;

const STATUSES: [&str; 3] = ["single", "complicated", "relationship"];
const CATEGORIES: [&str; 3] = ["電子", "食品", "書籍"];

/// People with ids `p-1..=p-count`. Ages cycle through 20..50.
pub fn make_people(count: usize, rng: &mut impl Rng) -> Vec<Record> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let n = i + 1;
            Record::new(format!("p-{n}"))
                .set("id", format!("p-{n}"))
                .set("firstName", format!("名{n}"))
                .set("lastName", format!("姓{n}"))
                .set("age", 20 + (i % 30) as i64)
                .set("visits", rng.random_range(0..1000i64))
                .set("status", STATUSES[i % 3])
                .set("progress", rng.random_range(0..100i64))
                .set("createdAt", now - Duration::seconds(i as i64 * 10_000))
        })
        .collect()
}

/// Products with ids `prd-1..=prd-count`.
pub fn make_products(count: usize, rng: &mut impl Rng) -> Vec<Record> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let n = i + 1;
            Record::new(format!("prd-{n}"))
                .set("id", format!("prd-{n}"))
                .set("name", format!("商品{n}"))
                .set("price", Decimal::from(rng.random_range(0..10_000i64)))
                .set("stock", rng.random_range(0..500i64))
                .set("category", CATEGORIES[i % 3])
                .set("updatedAt", now - Duration::seconds(i as i64 * 5_000))
        })
        .collect()
}

/// Random people with ids `0..count`, for the read-only catalog.
pub fn make_data(count: usize, rng: &mut impl Rng) -> Vec<Record> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            Record::new(i.to_string())
                .set("id", i.to_string())
                .set("firstName", format!("名{}", rng.random_range(1..=99)))
                .set("lastName", format!("姓{}", rng.random_range(1..=99)))
                .set("age", rng.random_range(18..=60i64))
                .set("visits", rng.random_range(1..=100i64))
                .set("status", STATUSES[rng.random_range(0..STATUSES.len())])
                .set("progress", rng.random_range(0..=100i64))
                .set(
                    "createdAt",
                    now - Duration::seconds(rng.random_range(0..=1_000_000_000i64)),
                )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use editgrid_lib::model::Dataset;

    use super::*;

    #[test]
    fn test_generated_datasets_are_valid() {
        let mut rng = rand::rng();
        let people = Dataset::new(make_people(300, &mut rng)).unwrap();
        let products = Dataset::new(make_products(300, &mut rng)).unwrap();
        let catalog = Dataset::new(make_data(300, &mut rng)).unwrap();

        assert_eq!(people.len(), 300);
        assert_eq!(people.find("p-1").unwrap().get_int("age").unwrap(), Some(20));
        assert_eq!(people.find("p-31").unwrap().get_int("age").unwrap(), Some(20));
        assert!(products.contains("prd-300"));
        assert_eq!(catalog.ids().collect::<HashSet<_>>().len(), 300);
        assert!(catalog.schema().iter().any(|f| f == "createdAt"));
    }

    #[test]
    fn test_catalog_values_in_range() {
        let mut rng = rand::rng();
        for record in make_data(200, &mut rng) {
            let age = record.get_int("age").unwrap().unwrap();
            assert!((18..=60).contains(&age));
            let status = record.get_string("status").unwrap().unwrap();
            assert!(STATUSES.contains(&status));
        }
    }
}
