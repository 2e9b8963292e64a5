//! Row height estimates.

/// Heights of a sequence of rows.
pub trait ItemSizes {
    /// Number of rows.
    fn count(&self) -> usize;

    /// Sum of all row heights.
    fn total_height(&self) -> u64;

    /// Top edge of the row at `index`. `offset_of(count())` is the total height.
    fn offset_of(&self, index: usize) -> u64;

    /// Index of the row covering `offset`, clamped to the last row.
    ///
    /// Only meaningful when `count() > 0`.
    fn index_at(&self, offset: u64) -> usize;
}

/// Every row has the same height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSize {
    count: usize,
    height: u64,
}

impl FixedSize {
    /// Creates a fixed-height estimate. Heights below 1 are raised to 1.
    pub fn new(count: usize, height: u64) -> Self {
        Self {
            count,
            height: height.max(1),
        }
    }

    /// Height of each row.
    pub fn height(&self) -> u64 {
        self.height
    }
}

impl ItemSizes for FixedSize {
    fn count(&self) -> usize {
        self.count
    }

    fn total_height(&self) -> u64 {
        self.count as u64 * self.height
    }

    fn offset_of(&self, index: usize) -> u64 {
        index.min(self.count) as u64 * self.height
    }

    fn index_at(&self, offset: u64) -> usize {
        let index = usize::try_from(offset / self.height).unwrap_or(usize::MAX);
        index.min(self.count.saturating_sub(1))
    }
}

/// Measured, variable row heights.
///
/// Uses cumulative height caching for O(1) offsets and O(log n) lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasuredSizes {
    cumulative: Vec<u64>,
}

impl Default for MeasuredSizes {
    fn default() -> Self {
        Self { cumulative: vec![0] }
    }
}

impl MeasuredSizes {
    /// Builds the cache from row heights.
    pub fn new(heights: impl IntoIterator<Item = u64>) -> Self {
        let mut cumulative = vec![0];
        let mut total: u64 = 0;
        for h in heights {
            total = total.saturating_add(h);
            cumulative.push(total);
        }
        Self { cumulative }
    }

    /// Height of the row at `index`.
    pub fn height(&self, index: usize) -> Option<u64> {
        Some(self.cumulative.get(index + 1)? - self.cumulative[index])
    }

    /// Replaces the measured height of one row.
    pub fn measure(&mut self, index: usize, height: u64) {
        let Some(old) = self.height(index) else {
            return;
        };
        if old == height {
            return;
        }
        for bottom in &mut self.cumulative[index + 1..] {
            *bottom = *bottom - old + height;
        }
    }
}

impl ItemSizes for MeasuredSizes {
    fn count(&self) -> usize {
        self.cumulative.len() - 1
    }

    fn total_height(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    fn offset_of(&self, index: usize) -> u64 {
        let last = self.cumulative.len() - 1;
        self.cumulative[index.min(last)]
    }

    fn index_at(&self, offset: u64) -> usize {
        self.cumulative
            .partition_point(|&h| h <= offset)
            .saturating_sub(1)
            .min(self.count().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_offsets() {
        let sizes = FixedSize::new(10, 36);
        assert_eq!(sizes.total_height(), 360);
        assert_eq!(sizes.offset_of(3), 108);
        assert_eq!(sizes.index_at(107), 2);
        assert_eq!(sizes.index_at(108), 3);
        assert_eq!(sizes.index_at(10_000), 9);
    }

    #[test]
    fn test_measured_lookup() {
        let sizes = MeasuredSizes::new([10, 20, 30]);
        assert_eq!(sizes.count(), 3);
        assert_eq!(sizes.total_height(), 60);
        assert_eq!(sizes.offset_of(2), 30);
        assert_eq!(sizes.index_at(0), 0);
        assert_eq!(sizes.index_at(10), 1);
        assert_eq!(sizes.index_at(29), 1);
        assert_eq!(sizes.index_at(59), 2);
        assert_eq!(sizes.index_at(500), 2);
    }

    #[test]
    fn test_measure_updates_later_offsets() {
        let mut sizes = MeasuredSizes::new([10, 10, 10]);
        sizes.measure(1, 25);
        assert_eq!(sizes.height(1), Some(25));
        assert_eq!(sizes.offset_of(2), 35);
        assert_eq!(sizes.total_height(), 45);
        sizes.measure(7, 1);
        assert_eq!(sizes.total_height(), 45);
    }
}
