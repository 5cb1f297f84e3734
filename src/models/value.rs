//! Dynamically typed field values

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single field value held by a record.
///
/// Values of different classes still order against each other: `Null`
/// sorts before booleans, booleans before numbers, numbers before text.
/// Integers and floats compare numerically with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Total order over all values, usable as a sort comparator.
    ///
    /// Guarantees `total_cmp(a, b) == total_cmp(b, a).reverse()` for
    /// every pair; ties report `Ordering::Equal`. Floats order by
    /// `f64::total_cmp`, so NaN has a fixed place instead of poisoning
    /// the sort. Mixed integer and float pairs compare exactly, without
    /// rounding through a cast.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Integer(a), Self::Float(b)) => integer_float_cmp(*a, *b),
            (Self::Float(a), Self::Integer(b)) => integer_float_cmp(*b, *a).reverse(),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.class_rank().cmp(&other.class_rank()),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn class_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

/// `i64` vs `f64` comparison in the `f64::total_cmp` order.
///
/// Exact at every magnitude: `f64` cannot represent every `i64` above
/// 2^53, so the comparison truncates the float rather than widening
/// the integer.
fn integer_float_cmp(a: i64, b: f64) -> Ordering {
    // 2^63; every i64 lies strictly below it.
    const I64_CEIL: f64 = 9_223_372_036_854_775_808.0;

    if b.is_nan() {
        // f64::total_cmp places negative NaN below and positive NaN
        // above every number.
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if b >= I64_CEIL {
        return Ordering::Less;
    }
    if b < -I64_CEIL {
        return Ordering::Greater;
    }

    let whole = b.trunc() as i64;
    match a.cmp(&whole) {
        Ordering::Equal if b.fract() > 0.0 => Ordering::Less,
        Ordering::Equal if b.fract() < 0.0 => Ordering::Greater,
        // Zero ties follow total_cmp, which splits -0.0 from 0.0.
        Ordering::Equal if a == 0 => 0.0f64.total_cmp(&b),
        other => other,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Text(s),
            // Arrays and objects flatten to their compact JSON text
            other => Self::Text(other.to_string()),
        }
    }
}
