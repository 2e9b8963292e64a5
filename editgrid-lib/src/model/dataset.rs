//! Immutable, shared record collection

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use super::Record;
use crate::error::DatasetError;

/// The authoritative, ordered collection of records.
///
/// A `Dataset` is never mutated in place. Every change builds a new
/// `Dataset`; records that did not change are shared with the previous
/// snapshot, so cloning a dataset or deriving a new one from it only copies
/// pointers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Arc<Vec<Arc<Record>>>,
    index: Arc<HashMap<String, usize>>,
    schema: Arc<Vec<String>>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a dataset, validating ids and schema.
    ///
    /// Every id must be non-blank and unique, and every record must carry the
    /// same field names as the first one.
    pub fn new(records: Vec<Record>) -> Result<Self, DatasetError> {
        Self::from_shared(records.into_iter().map(Arc::new).collect())
    }

    pub(crate) fn from_shared(records: Vec<Arc<Record>>) -> Result<Self, DatasetError> {
        let schema: Vec<String> = records
            .first()
            .map(|r| r.field_names().into_iter().map(String::from).collect())
            .unwrap_or_default();
        let schema_set: HashSet<&str> = schema.iter().map(|s| s.as_str()).collect();

        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.id().trim().is_empty() {
                return Err(DatasetError::BlankId { index: position });
            }
            if index.insert(record.id().to_string(), position).is_some() {
                return Err(DatasetError::DuplicateId {
                    id: record.id().to_string(),
                });
            }
            let matches_schema = record.fields().len() == schema.len()
                && record.fields().keys().all(|k| schema_set.contains(k.as_str()));
            if !matches_schema {
                return Err(DatasetError::SchemaMismatch {
                    id: record.id().to_string(),
                });
            }
        }

        Ok(Self {
            records: Arc::new(records),
            index: Arc::new(index),
            schema: Arc::new(schema),
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at a position.
    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position).map(|r| r.as_ref())
    }

    /// Returns the shared handle of the record at a position.
    pub fn shared(&self, position: usize) -> Option<&Arc<Record>> {
        self.records.get(position)
    }

    /// Finds a record by id.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.position(id).and_then(|p| self.get(p))
    }

    /// Returns the position of the record with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns `true` if a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates over the records in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().map(|r| r.as_ref())
    }

    /// Iterates over the record ids in dataset order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id())
    }

    /// Field names shared by every record, sorted.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Returns `true` if the records carry this field.
    pub fn has_field(&self, field: &str) -> bool {
        self.schema.iter().any(|f| f == field)
    }

    /// Returns a new dataset keeping only the records matching `keep`.
    pub fn retain(&self, mut keep: impl FnMut(&Record) -> bool) -> Self {
        let records: Vec<Arc<Record>> = self
            .records
            .iter()
            .filter(|r| keep(r.as_ref()))
            .cloned()
            .collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(position, r)| (r.id().to_string(), position))
            .collect();
        Self {
            records: Arc::new(records),
            index: Arc::new(index),
            schema: Arc::clone(&self.schema),
        }
    }

    /// Returns a new dataset where `update` may replace individual records.
    ///
    /// Records for which `update` returns `None` are shared unchanged.
    pub(crate) fn map_records(
        &self,
        mut update: impl FnMut(&Record) -> Option<Record>,
    ) -> Self {
        let records: Vec<Arc<Record>> = self
            .records
            .iter()
            .map(|r| match update(r.as_ref()) {
                Some(next) => Arc::new(next),
                None => Arc::clone(r),
            })
            .collect();
        Self {
            records: Arc::new(records),
            index: Arc::clone(&self.index),
            schema: Arc::clone(&self.schema),
        }
    }

    /// Returns `true` if both datasets share the same storage.
    pub fn ptr_eq(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}
