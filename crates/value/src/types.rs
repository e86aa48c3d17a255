//! Value types for tabula
//!
//! A `Value` is one cell of a record. Comparison follows the native semantics
//! of the value's type: numbers compare numerically (across integer, float and
//! decimal), strings lexically, dates and times chronologically.

use crate::data_type::DataType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A row of values, positionally matching a table's columns
pub type Row = Vec<Value>;

/// A single cell value
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Decimal(Decimal),
    Str(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an I64 value
    pub fn integer(i: i64) -> Self {
        Value::I64(i)
    }

    /// Create a string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        Value::Str(s.into())
    }

    /// Create a float value
    pub fn float(f: f64) -> Self {
        Value::F64(f)
    }

    /// Convert a JSON literal into a value.
    ///
    /// Scalars map onto their natural variant; arrays and objects stay JSON.
    /// Integers beyond the I64 range become exact decimals.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::I64(i),
                (None, Some(u)) => Value::Decimal(Decimal::from(u)),
                (None, None) => n.as_f64().map(Value::F64).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            other => Value::Json(other.clone()),
        }
    }

    // ========================================================================
    // Type Checks
    // ========================================================================

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is numeric (integer, float, or decimal)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_) | Value::Decimal(_))
    }

    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::I64(_) => DataType::I64,
            Value::F64(_) => DataType::F64,
            Value::Decimal(_) => DataType::Decimal,
            Value::Str(_) => DataType::Str,
            Value::Date(_) => DataType::Date,
            Value::Time(_) => DataType::Time,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Uuid(_) => DataType::Uuid,
            Value::Json(_) => DataType::Json,
        }
    }

    /// Interpret this value as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Compare two values using their native type semantics.
    ///
    /// Returns `None` when either side is NULL, when the types cannot be
    /// compared, or when the type has no order (JSON). NaN equals NaN and
    /// sorts after every other number.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
            (Value::F64(a), Value::F64(b)) => Some(compare_f64(*a, *b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => compare_mixed_numeric(a, b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Position of the variant, breaking ties between numerically equal
    /// values of different numeric variants
    fn variant_rank(&self) -> u8 {
        match self {
            Value::I64(_) => 0,
            Value::F64(_) => 1,
            Value::Decimal(_) => 2,
            _ => 0,
        }
    }

    /// Rank used to order values of different types against each other
    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::I64(_) | Value::F64(_) | Value::Decimal(_) => 2,
            Value::Str(_) => 3,
            Value::Date(_) => 4,
            Value::Time(_) => 5,
            Value::Timestamp(_) => 6,
            Value::Uuid(_) => 7,
            Value::Json(_) => 8,
        }
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ordering) => ordering,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}

/// Compare numbers of different variants, going through Decimal when exact
fn compare_mixed_numeric(a: &Value, b: &Value) -> Option<Ordering> {
    match (to_decimal(a), to_decimal(b)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => Some(compare_f64(to_f64(a)?, to_f64(b)?)),
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::I64(n) => Some(Decimal::from(*n)),
        Value::F64(f) => Decimal::from_f64(*f),
        Value::Decimal(d) => Some(*d),
        _ => None,
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::I64(n) => Some(*n as f64),
        Value::F64(f) => Some(*f),
        Value::Decimal(d) => d.to_f64(),
        _ => None,
    }
}

// ============================================================================
// Equality, Hashing, Ordering
// ============================================================================

/// Equality agrees with `Ord`: NaN equals NaN, -0.0 equals 0.0, and values
/// of different variants are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => compare_f64(*a, *b) == Ordering::Equal,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::I64(i) => i.hash(state),
            // -0.0 == 0.0, so both must hash alike
            Value::F64(f) if *f == 0.0 => 0f64.to_bits().hash(state),
            Value::F64(f) if f.is_nan() => f64::NAN.to_bits().hash(state),
            Value::F64(f) => f.to_bits().hash(state),
            Value::Decimal(d) => d.normalize().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::Timestamp(ts) => ts.hash(state),
            Value::Uuid(u) => u.hash(state),
            Value::Json(j) => j.to_string().hash(state),
        }
    }
}

impl Ord for Value {
    /// Total order used for sort keys and percentile ranking. NULL sorts
    /// first and NaN after every other number; values of unrelated types are
    /// ordered by type.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Json(a), Value::Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => match self.compare(other) {
                Some(Ordering::Equal) => self.variant_rank().cmp(&other.variant_rank()),
                Some(ordering) => ordering,
                None => self.type_rank().cmp(&other.type_rank()),
            },
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Display and Serialization
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(fl) => write!(f, "{}", fl),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::Timestamp(ts) => write!(f, "{}", ts),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::Json(j) => write!(f, "{}", j),
        }
    }
}

/// Values serialize as plain JSON. Decimals, temporal values and UUIDs are
/// rendered as strings so no precision is lost.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I64(i) => serializer.serialize_i64(*i),
            Value::F64(f) => serializer.serialize_f64(*f),
            Value::Decimal(d) => serializer.collect_str(d),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.collect_str(d),
            Value::Time(t) => serializer.collect_str(t),
            Value::Timestamp(ts) => serializer.collect_str(&ts.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Uuid(u) => serializer.collect_str(u),
            Value::Json(j) => j.serialize(serializer),
        }
    }
}
