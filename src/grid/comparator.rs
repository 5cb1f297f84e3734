//! Comparator construction
//!
//! Pure functions that turn a column attribute, a direction sign, a
//! value extractor and a base comparator into an ordering over records.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::models::{Record, Value};

use super::error::GridError;

/// Binary ordering over two records.
pub type RecordComparator = Arc<dyn Fn(&Record, &Record) -> Ordering + Send + Sync>;

/// Retrieves the sortable value of a record for an attribute.
pub type ValueExtractor = Arc<dyn Fn(&Record, &str) -> Value + Send + Sync>;

/// Base ordering over two extracted values.
pub type ValueComparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Default extractor: read the attribute straight off the record.
pub fn default_extractor() -> ValueExtractor {
    Arc::new(|record, attr| record.get(attr))
}

/// Default base comparator: the total order on `Value`.
pub fn default_base() -> ValueComparator {
    Arc::new(|left, right| left.total_cmp(right))
}

/// Build a record comparator for `attr` under `sign`.
///
/// `sign` is -1 for ascending and +1 for descending; a positive sign
/// compares the extracted values in swapped order. An absent `attr` or
/// `sign` yields `None`, the caller's signal to fall back to
/// [`insertion_order`].
///
/// The returned comparator has no state: extract both sides, apply
/// `base`, report ties as `Ordering::Equal`.
pub fn make_comparator(
    attr: Option<&str>,
    sign: Option<i8>,
    extract: ValueExtractor,
    base: ValueComparator,
) -> Option<RecordComparator> {
    let attr = attr?.to_string();
    let sign = sign?;
    Some(Arc::new(move |left, right| {
        let mut l = extract(left, &attr);
        let mut r = extract(right, &attr);
        if sign > 0 {
            std::mem::swap(&mut l, &mut r);
        }
        base(&l, &r)
    }))
}

/// Fallback comparator: original creation order, never attribute values.
pub fn insertion_order() -> RecordComparator {
    Arc::new(|left, right| left.seq().cmp(&right.seq()))
}

/// Look up a named base comparator from a column config file.
pub fn base_comparator(name: &str) -> Result<ValueComparator, GridError> {
    match name {
        "default" => Ok(default_base()),
        "text" => Ok(Arc::new(|l, r| l.to_string().cmp(&r.to_string()))),
        "nocase" => Ok(Arc::new(|l, r| {
            l.to_string()
                .to_lowercase()
                .cmp(&r.to_string().to_lowercase())
        })),
        "numeric" => Ok(Arc::new(|l, r| {
            let l = l.as_f64().unwrap_or(f64::NEG_INFINITY);
            let r = r.as_f64().unwrap_or(f64::NEG_INFINITY);
            l.total_cmp(&r)
        })),
        other => Err(GridError::UnknownComparator(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn record(age: i64) -> Record {
        let mut fields = HashMap::new();
        fields.insert("age".to_string(), Value::Integer(age));
        Record::new(fields)
    }

    fn by_age(sign: i8) -> RecordComparator {
        make_comparator(Some("age"), Some(sign), default_extractor(), default_base())
            .expect("both inputs present")
    }

    #[test]
    fn absent_attribute_or_sign_yields_no_comparator() {
        assert!(make_comparator(None, Some(-1), default_extractor(), default_base()).is_none());
        assert!(make_comparator(Some("age"), None, default_extractor(), default_base()).is_none());
    }

    #[test]
    fn negative_sign_puts_smallest_first() {
        let cmp = by_age(-1);
        let mut records = vec![record(30), record(10), record(20)];
        records.sort_by(|a, b| cmp(a, b));
        let ages: Vec<Value> = records.iter().map(|r| r.get("age")).collect();
        assert_eq!(
            ages,
            vec![Value::Integer(10), Value::Integer(20), Value::Integer(30)]
        );
    }

    #[test]
    fn opposite_signs_produce_mirrored_orders() {
        let asc = by_age(-1);
        let desc = by_age(1);
        let a = record(10);
        let b = record(20);
        assert_eq!(asc(&a, &b), desc(&a, &b).reverse());
        assert_eq!(asc(&b, &a), desc(&b, &a).reverse());
        assert_eq!(asc(&a, &a), Ordering::Equal);
        assert_eq!(desc(&a, &a), Ordering::Equal);
    }

    #[test]
    fn insertion_order_ignores_attribute_values() {
        let first = record(99);
        let second = record(1);
        let cmp = insertion_order();
        assert_eq!(cmp(&first, &second), Ordering::Less);
        assert_eq!(cmp(&second, &first), Ordering::Greater);
    }

    #[test]
    fn missing_attribute_extracts_null_and_sorts_first() {
        let cmp = by_age(-1);
        let with_age = record(5);
        let without = Record::new(HashMap::new());
        assert_eq!(cmp(&without, &with_age), Ordering::Less);
    }

    #[test]
    fn nocase_comparator_folds_case() {
        let cmp = base_comparator("nocase").unwrap();
        assert_eq!(
            cmp(
                &Value::Text("apple".to_string()),
                &Value::Text("BANANA".to_string())
            ),
            Ordering::Less
        );
    }

    #[test]
    fn unknown_comparator_name_is_rejected() {
        assert!(matches!(
            base_comparator("reverse"),
            Err(GridError::UnknownComparator(s)) if s == "reverse"
        ));
    }
}
