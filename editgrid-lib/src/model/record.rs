//! Dynamic grid record

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;

use super::Value;
use crate::error::FieldError;

/// One row of a dataset.
///
/// Records hold field values as a `HashMap<String, Value>` keyed by field
/// name. The `id` is fixed at construction and never changes; edits produce
/// new records through [`Record::with_fields`].
///
/// # Example
///
/// ```
/// use editgrid_lib::model::Record;
///
/// let record = Record::new("p-1")
///     .set("firstName", "Alice")
///     .set("age", 31i64);
///
/// assert_eq!(record.id(), "p-1");
/// assert_eq!(record.get_string("firstName").unwrap(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The unique identifier of the record.
    pub(crate) id: String,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new record with the given id and no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Returns the record id.
    pub fn id(&self) -> &str {
        &self.id
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the field names in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns a copy of this record with the given fields replaced.
    ///
    /// Fields not listed keep their current values; the id is unchanged.
    pub fn with_fields<'a>(
        &self,
        changes: impl IntoIterator<Item = (&'a String, &'a Value)>,
    ) -> Self {
        let mut next = self.clone();
        for (field, value) in changes {
            next.fields.insert(field.clone(), value.clone());
        }
        next
    }

    /// Converts the record into a JSON object including its id.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("id".into(), serde_json::Value::String(self.id.clone()));
        for (field, value) in &self.fields {
            map.insert(field.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }

    // =========================================================================
    // Typed getters
    //
    // Null yields Ok(None); a missing field or another kind is an error.
    // =========================================================================

    fn typed<'a, T>(
        &'a self,
        field: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, FieldError> {
        let value = self.fields.get(field).ok_or_else(|| FieldError::Missing {
            row: self.id.clone(),
            field: field.to_string(),
        })?;
        if value.is_null() {
            return Ok(None);
        }
        extract(value)
            .map(Some)
            .ok_or_else(|| FieldError::WrongType {
                row: self.id.clone(),
                field: field.to_string(),
                expected,
                actual: value.type_name(),
            })
    }

    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        self.typed(field, "string", |v| v.as_str())
    }

    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        self.typed(field, "int", |v| match v {
            Value::Int(n) => Some(*n),
            _ => None,
        })
    }

    /// Any numeric kind as `f64`. Numeric-looking strings are not accepted.
    pub fn get_number(&self, field: &str) -> Result<Option<f64>, FieldError> {
        self.typed(field, "number", |v| v.is_number().then(|| v.as_number()).flatten())
    }

    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.typed(field, "datetime", |v| match v {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let record = Record::new("p-1")
            .set("name", "Alice")
            .set("age", 31i64)
            .set("note", Value::Null);

        assert_eq!(record.get_string("name").unwrap(), Some("Alice"));
        assert_eq!(record.get_int("age").unwrap(), Some(31));
        assert_eq!(record.get_number("age").unwrap(), Some(31.0));
        assert_eq!(record.get_string("note").unwrap(), None);
        assert_eq!(
            record.get_string("missing"),
            Err(FieldError::Missing {
                row: "p-1".into(),
                field: "missing".into()
            })
        );
        let err = record.get_int("name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'name' of record 'p-1' holds string, not int"
        );
    }

    #[test]
    fn test_with_fields_keeps_unlisted_fields() {
        let record = Record::new("p-1").set("name", "Alice").set("age", 25i64);
        let changes: HashMap<String, Value> = [("age".to_string(), Value::Int(31))].into();

        let updated = record.with_fields(&changes);

        assert_eq!(updated.id(), "p-1");
        assert_eq!(updated.get("age"), Some(&Value::Int(31)));
        assert_eq!(updated.get("name"), Some(&Value::from("Alice")));
        assert_eq!(record.get("age"), Some(&Value::Int(25)));
    }

    #[test]
    fn test_to_json_includes_id() {
        let record = Record::new("prd-1").set("stock", 0i64);
        let json = record.to_json();
        assert_eq!(json["id"], "prd-1");
        assert_eq!(json["stock"], 0);
    }
}
