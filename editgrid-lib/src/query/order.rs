//! Sort specification.

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9, oldest first).
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

/// Ordering applied to the grid.
///
/// Holds `(column, direction)` pairs; the grid drives it with a single
/// active column that cycles `none → ascending → descending → none`.
///
/// # Example
///
/// ```
/// use editgrid_lib::query::{Direction, SortSpec};
///
/// let sort = SortSpec::none().cycle("age");
/// assert_eq!(sort.active(), Some(("age", Direction::Asc)));
///
/// let sort = sort.cycle("age").cycle("age");
/// assert!(sort.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    fields: Vec<(String, Direction)>,
}

impl SortSpec {
    /// No sorting; dataset order.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ascending on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            fields: vec![(column.into(), Direction::Asc)],
        }
    }

    /// Descending on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            fields: vec![(column.into(), Direction::Desc)],
        }
    }

    /// The active sort column and direction.
    pub fn active(&self) -> Option<(&str, Direction)> {
        self.fields.first().map(|(c, d)| (c.as_str(), *d))
    }

    /// Direction applied to a column, if it is the sort column.
    pub fn direction_of(&self, column: &str) -> Option<Direction> {
        self.active()
            .filter(|(c, _)| *c == column)
            .map(|(_, d)| d)
    }

    /// The direction a header click on `column` would switch to.
    pub fn next_direction(&self, column: &str) -> Option<Direction> {
        match self.direction_of(column) {
            None => Some(Direction::Asc),
            Some(Direction::Asc) => Some(Direction::Desc),
            Some(Direction::Desc) => None,
        }
    }

    /// Advances the cycle for `column`.
    ///
    /// A column other than the active one starts at ascending.
    pub fn cycle(&self, column: &str) -> Self {
        match self.next_direction(column) {
            Some(Direction::Asc) => Self::asc(column),
            Some(Direction::Desc) => Self::desc(column),
            None => Self::none(),
        }
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    /// Returns `true` when no sort is active.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order() {
        let s0 = SortSpec::none();
        let s1 = s0.cycle("age");
        let s2 = s1.cycle("age");
        let s3 = s2.cycle("age");
        assert_eq!(s1, SortSpec::asc("age"));
        assert_eq!(s2, SortSpec::desc("age"));
        assert_eq!(s3, SortSpec::none());
    }

    #[test]
    fn test_switching_column_restarts_ascending() {
        let sort = SortSpec::desc("age").cycle("name");
        assert_eq!(sort.active(), Some(("name", Direction::Asc)));
        assert_eq!(sort.direction_of("age"), None);
        assert_eq!(sort.fields().len(), 1);
    }
}
