use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::rule::ParameterType;

/// Supported value types for rule parameters.
///
/// Monetary and rate arithmetic stays in [`Decimal`] end to end; there is
/// deliberately no floating-point variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// An exact decimal number.
    Decimal(Decimal),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// A calendar date and time, without timezone.
    DateTime(NaiveDateTime),
}

impl Value {
    /// The declared parameter type this value satisfies.
    #[must_use]
    pub const fn data_type(&self) -> ParameterType {
        match self {
            Value::Int(_) => ParameterType::Integer,
            Value::Decimal(_) => ParameterType::Decimal,
            Value::Bool(_) => ParameterType::Boolean,
            Value::String(_) => ParameterType::Text,
            Value::DateTime(_) => ParameterType::DateTime,
        }
    }

    /// Numeric view of this value for use in arithmetic expressions.
    ///
    /// Integers widen losslessly, booleans map to 1/0, and strings are
    /// accepted when they parse as a decimal. Dates and non-numeric strings
    /// have no numeric form and return `None`.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(v) => Some(Decimal::from(*v)),
            Value::Decimal(v) => Some(*v),
            Value::Bool(v) => Some(if *v { Decimal::ONE } else { Decimal::ZERO }),
            Value::String(v) => v.trim().parse().ok(),
            Value::DateTime(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::DateTime(v.into())
    }
}

/// Renders the canonical string form used when conditions fall back to
/// textual comparison. Strings render without quotes, date-times in ISO 8601
/// without offset.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}
