//! Records and record loading

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use super::value::Value;

/// Process-wide creation sequence, the basis for insertion-order sorting.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// A single row of the grid: named fields plus a creation sequence
/// number handed out at construction.
#[derive(Debug, Clone)]
pub struct Record {
    seq: u64,
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new(fields: HashMap<String, Value>) -> Self {
        Self {
            seq: NEXT_SEQ.fetch_add(1, Ordering::SeqCst),
            fields,
        }
    }

    /// Creation sequence number; strictly increases in creation order.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Field value for `attr`; missing attributes read as `Value::Null`.
    pub fn get(&self, attr: &str) -> Value {
        self.fields.get(attr).cloned().unwrap_or(Value::Null)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Parse a JSON array of flat objects into records.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let fields = row
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect();
            Record::new(fields)
        })
        .collect())
}

/// Load records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_strictly_increase() {
        let a = Record::new(HashMap::new());
        let b = Record::new(HashMap::new());
        let c = Record::new(HashMap::new());
        assert!(a.seq() < b.seq());
        assert!(b.seq() < c.seq());
    }

    #[test]
    fn missing_fields_read_as_null() {
        let record = Record::new(HashMap::new());
        assert_eq!(record.get("anything"), Value::Null);
    }

    #[test]
    fn parses_array_of_flat_objects() {
        let records = parse_records(
            r#"[{"name": "alice", "age": 30}, {"name": "bob", "age": 25}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Value::Text("alice".to_string()));
        assert_eq!(records[1].get("age"), Value::Integer(25));
        assert!(records[0].seq() < records[1].seq());
    }

    #[test]
    fn rejects_non_object_rows() {
        assert!(parse_records(r#"["just a string"]"#).is_err());
        assert!(parse_records(r#"{"not": "an array"}"#).is_err());
    }
}
