//! Value enum for dynamic field values

use std::fmt;

use chrono::DateTime;
use chrono::Local;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

/// Format used when a date is shown without a column-specific format.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Date-only counterpart of [`DEFAULT_DATETIME_FORMAT`].
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

/// A dynamic value held by one field of a [`Record`](super::Record).
///
/// # Type Mapping
///
/// | Field kind | Rust Variant |
/// |------------|--------------|
/// | empty | `Null` |
/// | flag | `Bool` |
/// | integer | `Int` |
/// | floating point | `Float` |
/// | price / exact decimal | `Decimal` |
/// | text, enum-like text | `String` |
/// | timestamp | `DateTime` |
///
/// # Example
///
/// ```
/// use editgrid_lib::model::Value;
///
/// let name = Value::from("Alice");
/// let age = Value::from(31i64);
/// let empty = Value::Null;
/// assert_eq!(age.as_number(), Some(31.0));
/// assert_eq!(empty.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Exact decimal.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Point in time.
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for the numeric variants.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Decimal(_))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Coerces the value to a number.
    ///
    /// Numeric variants convert directly. Strings are trimmed and parsed, so
    /// an edited `"31"` compares like `31`. Everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) if n.is_finite() => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Coerces the value to a point in time.
    ///
    /// Strings are accepted in the forms [`parse_datetime`] understands.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => parse_datetime(s, None),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Converts the value into JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Parses user-entered numeric text. Blank or malformed text is `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses text as a point in time.
///
/// RFC 3339 is tried first. Otherwise the text is read as local time using
/// `pattern` (when given), [`DEFAULT_DATETIME_FORMAT`] and
/// [`DEFAULT_DATE_FORMAT`], in that order. Date-only patterns resolve to
/// local midnight.
pub fn parse_datetime(text: &str, pattern: Option<&str>) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    pattern
        .into_iter()
        .chain([DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT])
        .find_map(|pattern| parse_local(trimmed, pattern))
}

fn parse_local(text: &str, pattern: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text, pattern).ok().or_else(|| {
        NaiveDate::parse_from_str(text, pattern)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

impl fmt::Display for Value {
    /// String coercion used for display and text filtering. Null is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Decimal(d) => write!(f, "{}", d.normalize()),
            Value::String(s) => f.write_str(s),
            Value::DateTime(dt) => write!(
                f,
                "{}",
                dt.with_timezone(&Local).format(DEFAULT_DATETIME_FORMAT)
            ),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
