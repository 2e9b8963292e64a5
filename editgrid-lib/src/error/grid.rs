//! Grid controller errors

use super::DatasetError;

/// Error returned by grid operations that address rows or columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// No record with this id exists in the current dataset.
    #[error("unknown row '{0}'")]
    UnknownRow(String),

    /// No column with this id is configured.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The column does not accept edits.
    #[error("column '{0}' is read-only")]
    ReadOnlyColumn(String),

    /// The grid is read-only or not in edit mode.
    #[error("editing is disabled")]
    EditingDisabled,

    /// Row selection is turned off for this grid.
    #[error("selection is disabled")]
    SelectionDisabled,

    /// A replacement dataset failed validation.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
