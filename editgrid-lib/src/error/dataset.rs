//! Dataset construction errors

/// Why a sequence of records could not become a [`Dataset`](crate::model::Dataset).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// A record has an empty or whitespace-only id.
    #[error("record at position {index} has a blank id")]
    BlankId { index: usize },

    /// Two records share the same id.
    #[error("duplicate record id '{id}'")]
    DuplicateId { id: String },

    /// A record's field names differ from the first record's.
    #[error("record '{id}' does not match the dataset schema")]
    SchemaMismatch { id: String },
}
