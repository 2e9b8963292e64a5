//! Section workflow errors

use crate::section::SectionMode;

/// Error returned when a section action is not available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// The section only displays data.
    #[error("section is read-only")]
    ReadOnly,

    /// The action is not offered in the current mode.
    #[error("cannot {action} while {mode}")]
    WrongMode {
        action: &'static str,
        mode: SectionMode,
    },

    /// The action needs at least one selected row.
    #[error("no rows selected")]
    NothingSelected,
}
