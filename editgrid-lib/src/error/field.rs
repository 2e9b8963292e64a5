//! Typed field access errors

/// Returned by the typed getters on `Record`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("record '{row}' has no field '{field}'")]
    Missing { row: String, field: String },

    /// The field holds a value of another kind.
    #[error("field '{field}' of record '{row}' holds {actual}, not {expected}")]
    WrongType {
        row: String,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}
