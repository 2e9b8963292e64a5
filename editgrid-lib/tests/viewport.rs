// Property tests for the windower.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use editgrid_lib::column::Column;
use editgrid_lib::model::{Dataset, Record};
use editgrid_lib::viewport::{FixedSize, ItemSizes, MeasuredSizes, compute_window};
use editgrid_lib::{GridController, GridOptions};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn prop_fixed_window_matches_formula(
        n in 1usize..20_000,
        h in 1u64..100,
        viewport in 1u64..2_000,
        k in 0usize..20,
        scroll_frac in 0.0f64..=1.0,
    ) {
        let sizes = FixedSize::new(n, h);
        let max_scroll = sizes.total_height().saturating_sub(viewport);
        let s = (max_scroll as f64 * scroll_frac) as u64;

        let w = compute_window(&sizes, s, viewport, k);

        let first = ((s / h) as usize).saturating_sub(k);
        let last = (((s + viewport) / h) as usize + k).min(n - 1);
        prop_assert_eq!(w.first, first);
        prop_assert_eq!(w.last(), Some(last));
        prop_assert_eq!(w.total_height, n as u64 * h);
        prop_assert_eq!(w.padding_top, first as u64 * h);
        prop_assert_eq!(w.padding_bottom, w.total_height - (last as u64 + 1) * h);
    }

    #[test]
    fn prop_window_covers_viewport(
        heights in prop::collection::vec(0u64..60, 1..400),
        viewport in 1u64..1_000,
        k in 0usize..5,
        scroll in any::<u64>(),
    ) {
        let sizes = MeasuredSizes::new(heights.iter().copied());
        let w = compute_window(&sizes, scroll, viewport, k);
        let total = sizes.total_height();
        let s = scroll.min(total.saturating_sub(viewport));

        prop_assert!(w.end <= heights.len());
        prop_assert!(!w.is_empty());
        prop_assert!(w.padding_top <= s);
        let rendered_bottom = total - w.padding_bottom;
        prop_assert!(rendered_bottom >= (s + viewport).min(total));
        prop_assert_eq!(
            w.padding_top + (sizes.offset_of(w.end) - sizes.offset_of(w.first)) + w.padding_bottom,
            total
        );
    }
}

#[test]
fn test_zero_rows() {
    let w = compute_window(&FixedSize::new(0, 36), 1_000, 360, 10);
    assert!(w.is_empty());
    assert_eq!((w.total_height, w.padding_top, w.padding_bottom), (0, 0, 0));
}

#[test]
fn test_controller_clamps_scroll_when_rows_shrink() {
    let records = (0..1_000)
        .map(|i| Record::new(i.to_string()).set("n", i as i64))
        .collect();
    let mut grid = GridController::new(
        Dataset::new(records).unwrap(),
        vec![Column::new("n", "N")],
        GridOptions::default(),
    );

    grid.scroll_end();
    let slice = grid.visible_rows();
    assert_eq!(slice.window.last(), Some(999));
    assert_eq!(grid.scroll().offset, 1_000 * 36 - 360);

    grid.set_range_filter_input("n", "", "4");
    assert_eq!(grid.scroll().offset, 0);
    let slice = grid.visible_rows();
    assert_eq!(slice.rows.len(), 5);
    assert_eq!(slice.window.first, 0);
}

#[test]
fn test_scroll_deltas_coalesce_per_frame() {
    let records = (0..100)
        .map(|i| Record::new(i.to_string()).set("n", i as i64))
        .collect();
    let mut grid = GridController::new(
        Dataset::new(records).unwrap(),
        vec![Column::new("n", "N")],
        GridOptions::default().overscan(0),
    );
    grid.scroll_by(36);
    grid.scroll_by(36);
    grid.scroll_by(36);
    let slice = grid.visible_rows();
    assert_eq!(grid.scroll().offset, 108);
    assert_eq!(slice.window.first, 3);
    assert_eq!(slice.rows[0].id(), "3");
}
