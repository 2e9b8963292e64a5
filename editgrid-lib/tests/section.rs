use editgrid_lib::column::Column;
use editgrid_lib::error::SectionError;
use editgrid_lib::model::{Dataset, Record, Value};
use editgrid_lib::section::{Section, SectionMode};

fn section() -> Section {
    let records = [25i64, 31, 33, 40, 45]
        .iter()
        .enumerate()
        .map(|(i, age)| {
            Record::new(format!("p-{}", i + 1))
                .set("firstName", format!("Person {}", i + 1))
                .set("age", *age)
        })
        .collect();
    Section::new(
        "People",
        Dataset::new(records).unwrap(),
        vec![Column::new("firstName", "First Name"), Column::new("age", "Age")],
    )
}

#[test]
fn test_select_all_then_assign() {
    let mut section = section();
    section.toggle_packaging().unwrap();
    section.grid_mut().toggle_all().unwrap();
    assert_eq!(section.counts().selected, 5);

    assert_eq!(section.assign(), Ok(5));
    assert_eq!(section.counts().selected, 0);
    let ids: Vec<&str> = section.package().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["p-1", "p-2", "p-3", "p-4", "p-5"]);
    assert_eq!(section.package()[0].to_json()["age"], 25);
}

#[test]
fn test_filtered_select_all_assigns_only_matches() {
    let mut section = section();
    section.toggle_packaging().unwrap();
    section.grid_mut().set_range_filter_input("age", "30", "39");
    section.grid_mut().toggle_all().unwrap();
    assert_eq!(section.assign(), Ok(2));
    assert_eq!(section.counts().filtered, 2);

    section.clear_filters();
    assert_eq!(section.counts().filtered, 5);
}

#[test]
fn test_save_commits_and_leaves_edit_mode() {
    let mut section = section();
    section.toggle_edit().unwrap();
    section.grid_mut().edit_cell("p-1", "age", "31").unwrap();
    assert!(section.has_unsaved_changes());

    section.save().unwrap();
    assert_eq!(section.mode(), SectionMode::Browse);
    assert_eq!(
        section.grid().dataset().find("p-1").unwrap().get("age"),
        Some(&Value::Int(31))
    );
    assert_eq!(
        section.save(),
        Err(SectionError::WrongMode {
            action: "save",
            mode: SectionMode::Browse
        })
    );
}

#[test]
fn test_delete_clears_pending_edits() {
    let mut section = section();
    section.grid_mut().toggle_row("p-5").unwrap();
    section.toggle_edit().unwrap();
    section.grid_mut().edit_cell("p-1", "age", "50").unwrap();
    section.toggle_edit().unwrap();

    assert_eq!(section.delete_selected(), Ok(1));
    assert_eq!(section.counts().total, 4);
    assert!(section.grid().dirty().is_empty());
}
