//! Literal coercion to column types
//!
//! Filter literals arrive as JSON scalars. Before they are compared against a
//! column they are converted to the column's native type, so that a date column
//! compares chronologically and a numeric column numerically.

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::types::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;
use uuid::Uuid;

/// Check if a value type can be coerced to a target type
pub fn can_coerce(from: &DataType, to: &DataType) -> bool {
    if from == to {
        return true;
    }

    match (from, to) {
        // NULL can go into anything
        (DataType::Null, _) => true,

        // Numeric widening
        (DataType::I64, DataType::F64 | DataType::Decimal) => true,
        (DataType::F64, DataType::Decimal) => true,

        // Strings are parsed at coercion time
        (
            DataType::Str,
            DataType::Bool
            | DataType::I64
            | DataType::F64
            | DataType::Decimal
            | DataType::Date
            | DataType::Time
            | DataType::Timestamp
            | DataType::Uuid,
        ) => true,

        _ => false,
    }
}

impl Value {
    /// Convert this value to the target type
    pub fn coerce_to(&self, target: &DataType) -> Result<Value> {
        if self.is_null() || self.data_type() == *target {
            return Ok(self.clone());
        }

        match (self, target) {
            (Value::I64(i), DataType::F64) => Ok(Value::F64(*i as f64)),
            (Value::I64(i), DataType::Decimal) => Ok(Value::Decimal(Decimal::from(*i))),
            (Value::F64(f), DataType::Decimal) => Decimal::from_f64(*f)
                .map(Value::Decimal)
                .ok_or_else(|| coercion_error(self, target)),
            (Value::Str(s), _) => parse_string(s, target),
            _ => Err(coercion_error(self, target)),
        }
    }
}

/// Parse a string into a value of the target type
fn parse_string(s: &str, target: &DataType) -> Result<Value> {
    let trimmed = s.trim();
    let parsed = match target {
        DataType::Bool => match trimmed.to_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Some(Value::Bool(true)),
            "false" | "f" | "no" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        DataType::I64 => trimmed.parse().ok().map(Value::I64),
        DataType::F64 => trimmed.parse().ok().map(Value::F64),
        DataType::Decimal => Decimal::from_str(trimmed).ok().map(Value::Decimal),
        DataType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
        DataType::Time => NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f"))
            .ok()
            .map(Value::Time),
        DataType::Timestamp => NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(Value::Timestamp),
        DataType::Uuid => Uuid::parse_str(trimmed).ok().map(Value::Uuid),
        DataType::Str => Some(Value::Str(s.to_string())),
        _ => None,
    };

    parsed.ok_or_else(|| Error::Coercion {
        value: format!("'{}'", s),
        target: target.to_string(),
    })
}

fn coercion_error(value: &Value, target: &DataType) -> Error {
    Error::Coercion {
        value: format!("{:?}", value),
        target: target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_date() {
        let value = Value::string("2015-10-03").coerce_to(&DataType::Date).unwrap();
        assert_eq!(
            value,
            Value::Date(NaiveDate::from_ymd_opt(2015, 10, 3).unwrap())
        );
    }

    #[test]
    fn test_integer_widening() {
        assert_eq!(
            Value::integer(3).coerce_to(&DataType::F64).unwrap(),
            Value::float(3.0)
        );
        assert_eq!(
            Value::integer(3).coerce_to(&DataType::Decimal).unwrap(),
            Value::Decimal(Decimal::from(3))
        );
    }

    #[test]
    fn test_null_passes_through() {
        assert_eq!(Value::Null.coerce_to(&DataType::Date).unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_string() {
        let err = Value::string("not a date")
            .coerce_to(&DataType::Date)
            .unwrap_err();
        assert!(matches!(err, Error::Coercion { .. }));
    }

    #[test]
    fn test_can_coerce() {
        assert!(can_coerce(&DataType::Str, &DataType::Timestamp));
        assert!(can_coerce(&DataType::Null, &DataType::Json));
        assert!(!can_coerce(&DataType::Bool, &DataType::I64));
    }
}
