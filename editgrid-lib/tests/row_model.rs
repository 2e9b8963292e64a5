use editgrid_lib::column::{Column, ColumnKind};
use editgrid_lib::model::{Dataset, Record, Value};
use editgrid_lib::query::{
    ColumnFilter, Committed, FilterPolicy, FilterSpec, SortSpec, compute_view,
};
use editgrid_lib::{GridController, GridOptions};
use proptest::prelude::*;

fn people(ages: &[i64]) -> Dataset {
    let records = ages
        .iter()
        .enumerate()
        .map(|(i, age)| {
            Record::new(format!("p-{}", i + 1))
                .set("firstName", format!("Person {}", i + 1))
                .set("status", if i % 2 == 0 { "single" } else { "complicated" })
                .set("age", *age)
        })
        .collect();
    Dataset::new(records).unwrap()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("firstName", "First Name"),
        Column::new("status", "Status"),
        Column::new("age", "Age").kind(ColumnKind::Number),
    ]
}

fn ids(grid: &GridController) -> Vec<String> {
    grid.filtered_ids().map(String::from).collect()
}

#[test]
fn test_age_range_scenario() {
    let dataset = people(&[25, 31, 33, 40, 45]);
    let mut grid = GridController::new(dataset, columns(), GridOptions::default());
    grid.set_filter("age", ColumnFilter::range(Some(30.0), Some(39.0)));
    assert_eq!(ids(&grid), vec!["p-2", "p-3"]);
    assert_eq!(grid.filtered_count(), 2);
}

#[test]
fn test_filtering_is_idempotent() {
    let dataset = people(&[25, 31, 33, 40, 45]);
    let filters = FilterSpec::new()
        .with("age", ColumnFilter::range(Some(30.0), None))
        .with("status", ColumnFilter::contains("SINGLE"));
    let cols = columns();

    let first = compute_view(&dataset, &cols, &filters, &SortSpec::desc("age"), &Committed);
    let second = compute_view(&dataset, &cols, &filters, &SortSpec::desc("age"), &Committed);
    assert_eq!(first, second);
    assert_eq!(first.ids(&dataset).collect::<Vec<_>>(), vec!["p-5", "p-3"]);
}

#[test]
fn test_malformed_bounds_never_fail() {
    let mut grid = GridController::new(people(&[25, 31, 33]), columns(), GridOptions::default());
    grid.set_range_filter_input("age", "abc", "");
    assert_eq!(grid.filtered_count(), 3);
    assert!(grid.filters().is_empty());

    grid.set_range_filter_input("age", "39", "30");
    assert_eq!(ids(&grid), vec!["p-2", "p-3"]);
}

#[test]
fn test_edit_moves_row_into_filter_with_effective_values() {
    let mut grid = GridController::new(
        people(&[25, 31, 33, 40, 45]),
        columns(),
        GridOptions::default().editing(true),
    );
    grid.set_range_filter_input("age", "30", "39");
    grid.edit_cell("p-1", "age", "31").unwrap();
    assert_eq!(ids(&grid), vec!["p-1", "p-2", "p-3"]);
    assert_eq!(grid.effective_value("p-1", "age"), &Value::Int(31));
}

#[test]
fn test_edit_ignored_by_committed_policy_until_saved() {
    let mut grid = GridController::new(
        people(&[25, 31, 33, 40, 45]),
        columns(),
        GridOptions::default()
            .editing(true)
            .filter_policy(FilterPolicy::Committed),
    );
    grid.set_range_filter_input("age", "30", "39");
    grid.edit_cell("p-1", "age", "31").unwrap();
    assert_eq!(ids(&grid), vec!["p-2", "p-3"]);

    grid.commit_edits();
    assert_eq!(ids(&grid), vec!["p-1", "p-2", "p-3"]);
}

#[test]
fn test_non_numeric_edit_fails_active_range() {
    let mut grid = GridController::new(
        people(&[31, 33]),
        columns(),
        GridOptions::default().editing(true),
    );
    grid.set_range_filter_input("age", "30", "");
    grid.edit_cell("p-1", "age", "thirty").unwrap();
    assert_eq!(grid.effective_value("p-1", "age"), &Value::from("thirty"));
    assert_eq!(ids(&grid), vec!["p-2"]);
}

#[test]
fn test_sort_cycle_through_controller() {
    let mut grid = GridController::new(people(&[33, 25, 45]), columns(), GridOptions::default());
    grid.toggle_sort("age").unwrap();
    assert_eq!(ids(&grid), vec!["p-2", "p-1", "p-3"]);
    grid.toggle_sort("age").unwrap();
    assert_eq!(ids(&grid), vec!["p-3", "p-1", "p-2"]);
    grid.toggle_sort("age").unwrap();
    assert_eq!(ids(&grid), vec!["p-1", "p-2", "p-3"]);
}

#[test]
fn test_empty_dataset() {
    let mut grid = GridController::new(Dataset::empty(), columns(), GridOptions::default());
    grid.set_text_filter("firstName", "x");
    assert_eq!(grid.filtered_count(), 0);
    let slice = grid.visible_rows();
    assert!(slice.rows.is_empty());
    assert_eq!(slice.window.padding_top + slice.window.padding_bottom, 0);
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_sort_is_stable_and_ordered(
        ages in prop::collection::vec(0i64..10, 0..60),
        desc in any::<bool>(),
    ) {
        let dataset = people(&ages);
        let sort = if desc { SortSpec::desc("age") } else { SortSpec::asc("age") };
        let view = compute_view(&dataset, &columns(), &FilterSpec::new(), &sort, &Committed);

        prop_assert_eq!(view.len(), ages.len());
        for pair in view.positions().windows(2) {
            let (a, b) = (ages[pair[0]], ages[pair[1]]);
            if a == b {
                prop_assert!(pair[0] < pair[1], "ties must keep dataset order");
            } else if desc {
                prop_assert!(a > b);
            } else {
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn prop_filtered_view_is_subset(
        ages in prop::collection::vec(0i64..100, 0..80),
        lo in 0f64..100.0,
        hi in 0f64..100.0,
    ) {
        let dataset = people(&ages);
        let filters = FilterSpec::new().with("age", ColumnFilter::range(Some(lo), Some(hi)));
        let view = compute_view(&dataset, &columns(), &filters, &SortSpec::none(), &Committed);
        let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };

        let expected: Vec<usize> = ages
            .iter()
            .enumerate()
            .filter(|(_, age)| (lo..=hi).contains(&(**age as f64)))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(view.positions(), expected.as_slice());
    }
}
