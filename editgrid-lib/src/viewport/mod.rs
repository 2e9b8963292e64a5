//! Viewport windowing.
//!
//! Maps row count and scroll geometry to the contiguous range of rows worth
//! materializing, padded with overscan rows on both sides.

mod scroll;
mod sizes;

pub use scroll::*;
pub use sizes::*;

use std::ops::Range;

/// Default row height estimate.
pub const DEFAULT_ROW_HEIGHT: u64 = 36;
/// Default rows rendered beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 10;
/// Default viewport height.
pub const DEFAULT_VIEWPORT_HEIGHT: u64 = 360;

/// Rows to materialize plus the spacer heights around them.
///
/// `padding_top + height(first..end) + padding_bottom == total_height`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportWindow {
    /// First materialized row.
    pub first: usize,
    /// One past the last materialized row.
    pub end: usize,
    pub total_height: u64,
    pub padding_top: u64,
    pub padding_bottom: u64,
}

impl ViewportWindow {
    /// Last materialized row, `None` when the window is empty.
    pub fn last(&self) -> Option<usize> {
        self.end.checked_sub(1).filter(|&last| last >= self.first)
    }

    /// Row index range.
    pub fn range(&self) -> Range<usize> {
        self.first..self.end
    }

    /// Number of materialized rows.
    pub fn len(&self) -> usize {
        self.end - self.first
    }

    /// Returns `true` when nothing is materialized.
    pub fn is_empty(&self) -> bool {
        self.end == self.first
    }
}

/// Computes the window for a scroll position.
///
/// `scroll` is clamped to `[0, total - viewport]` first, so the result always
/// indexes existing rows. With no rows the window is empty and unpadded.
///
/// # Example
///
/// ```
/// use editgrid_lib::viewport::{FixedSize, compute_window};
///
/// let window = compute_window(&FixedSize::new(10_000, 36), 36_000, 360, 10);
/// assert_eq!(window.first, 990);
/// assert_eq!(window.last(), Some(1020));
/// assert_eq!(window.padding_top, 990 * 36);
/// ```
pub fn compute_window(
    sizes: &impl ItemSizes,
    scroll: u64,
    viewport: u64,
    overscan: usize,
) -> ViewportWindow {
    let count = sizes.count();
    if count == 0 {
        return ViewportWindow::default();
    }

    let total_height = sizes.total_height();
    let scroll = scroll.min(total_height.saturating_sub(viewport));

    let first = sizes.index_at(scroll).saturating_sub(overscan);
    let last = sizes
        .index_at(scroll.saturating_add(viewport))
        .saturating_add(overscan)
        .min(count - 1);

    ViewportWindow {
        first,
        end: last + 1,
        total_height,
        padding_top: sizes.offset_of(first),
        padding_bottom: total_height - sizes.offset_of(last + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let window = compute_window(&FixedSize::new(0, 36), 500, 360, 10);
        assert_eq!(window, ViewportWindow::default());
        assert!(window.is_empty());
        assert_eq!(window.last(), None);
    }

    #[test]
    fn test_top_of_list() {
        let window = compute_window(&FixedSize::new(10_000, 36), 0, 360, 10);
        assert_eq!(window.first, 0);
        assert_eq!(window.last(), Some(20));
        assert_eq!(window.total_height, 360_000);
        assert_eq!(window.padding_top, 0);
        assert_eq!(window.padding_bottom, 360_000 - 21 * 36);
    }

    #[test]
    fn test_scroll_past_end_is_clamped() {
        let window = compute_window(&FixedSize::new(100, 36), 1_000_000, 360, 10);
        assert_eq!(window.last(), Some(99));
        assert_eq!(window.first, 90 - 10);
        assert_eq!(window.padding_bottom, 0);
    }

    #[test]
    fn test_fewer_rows_than_viewport() {
        let window = compute_window(&FixedSize::new(3, 36), 0, 360, 10);
        assert_eq!(window.range(), 0..3);
        assert_eq!(window.padding_top + window.padding_bottom, 0);
    }

    #[test]
    fn test_measured_sizes() {
        let sizes = MeasuredSizes::new([10, 50, 10, 10, 10]);
        let window = compute_window(&sizes, 20, 30, 0);
        assert_eq!(window.range(), 1..2);
        assert_eq!(window.padding_top, 10);
        assert_eq!(window.padding_bottom, 30);

        let window = compute_window(&sizes, 20, 45, 1);
        assert_eq!(window.range(), 0..4);
        assert_eq!(window.padding_bottom, 10);
    }
}
