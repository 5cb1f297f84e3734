//! Column definitions and column configuration files

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::models::Record;

use super::comparator::{
    base_comparator, default_base, default_extractor, make_comparator, RecordComparator,
    ValueComparator, ValueExtractor,
};
use super::direction::Direction;
use super::error::GridError;

/// Context handed to sortability predicates on every activation.
pub struct SortContext<'a> {
    pub column: &'a Column,
    /// First visible record of the collection, if any.
    pub record: Option<&'a Record>,
}

/// Whether a column may be sorted.
///
/// `When` predicates are re-evaluated on every activation, never
/// cached, so sortability may change with the data.
#[derive(Clone)]
pub enum Sortable {
    Always(bool),
    When(Arc<dyn Fn(&SortContext) -> bool + Send + Sync>),
}

/// How a header cell renders its label and direction indicator.
#[derive(Clone)]
pub enum HeaderStyle {
    /// Label plus an arrow while the column is the active sort key.
    Arrows,
    /// Label only, no indicator.
    Plain,
    /// Caller-supplied rendering of label and direction.
    Custom(Arc<dyn Fn(&str, Direction) -> String + Send + Sync>),
}

/// A column definition: unique name, display label, sortability, and
/// optional extractor/comparator overrides.
#[derive(Clone)]
pub struct Column {
    pub name: String,
    pub label: String,
    pub width: Option<u16>,
    pub header_style: HeaderStyle,
    sortable: Sortable,
    comparator: Option<ValueComparator>,
    value: Option<ValueExtractor>,
}

impl Column {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: default_label(name),
            width: None,
            header_style: HeaderStyle::Arrows,
            sortable: Sortable::Always(true),
            comparator: None,
            value: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = Sortable::Always(sortable);
        self
    }

    /// Sortability decided per activation by `predicate`.
    pub fn sortable_when(
        mut self,
        predicate: impl Fn(&SortContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.sortable = Sortable::When(Arc::new(predicate));
        self
    }

    pub fn with_comparator(mut self, comparator: ValueComparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn with_value(mut self, value: ValueExtractor) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_header_style(mut self, style: HeaderStyle) -> Self {
        self.header_style = style;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Evaluate sortability against the activation context.
    pub fn is_sortable(&self, ctx: &SortContext) -> bool {
        match &self.sortable {
            Sortable::Always(flag) => *flag,
            Sortable::When(predicate) => predicate(ctx),
        }
    }

    /// Build this column's comparator for `sign`, honoring any
    /// extractor and comparator overrides. `None` when the sign is
    /// absent; the caller substitutes the insertion-order fallback.
    pub fn make_comparator(&self, sign: Option<i8>) -> Option<RecordComparator> {
        let extract = self.value.clone().unwrap_or_else(default_extractor);
        let base = self.comparator.clone().unwrap_or_else(default_base);
        make_comparator(Some(&self.name), sign, extract, base)
    }
}

/// Column config file entry. `sortable` takes a boolean or `"auto"`;
/// `comparator` names a registry entry.
#[derive(Debug, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub sortable: Option<SortableSpec>,
    #[serde(default)]
    pub comparator: Option<String>,
    #[serde(default)]
    pub width: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SortableSpec {
    Flag(bool),
    Mode(String),
}

impl ColumnSpec {
    pub fn into_column(self) -> Result<Column, GridError> {
        let mut column = Column::new(&self.name);
        if let Some(label) = self.label {
            column = column.with_label(&label);
        }
        if let Some(width) = self.width {
            column = column.with_width(width);
        }
        if let Some(name) = self.comparator {
            column = column.with_comparator(base_comparator(&name)?);
        }
        match self.sortable {
            Some(SortableSpec::Flag(flag)) => column = column.with_sortable(flag),
            Some(SortableSpec::Mode(mode)) if mode == "auto" => {
                // Sortable while the context record carries a value here
                column = column.sortable_when(|ctx: &SortContext| {
                    ctx.record
                        .map(|record| !record.get(&ctx.column.name).is_null())
                        .unwrap_or(false)
                });
            }
            Some(SortableSpec::Mode(other)) => {
                return Err(GridError::InvalidSortable(other));
            }
            None => {}
        }
        Ok(column)
    }
}

/// Load column definitions from a JSON config file.
pub fn load_columns(path: &Path) -> Result<Vec<Column>> {
    let content = std::fs::read_to_string(path)?;
    let specs: Vec<ColumnSpec> = serde_json::from_str(&content)?;
    let mut columns = Vec::with_capacity(specs.len());
    for spec in specs {
        columns.push(spec.into_column()?);
    }
    Ok(columns)
}

/// Derive columns from loaded records: every field name seen, in
/// alphabetical order.
pub fn derive_columns(records: &[Record]) -> Vec<Column> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for name in record.field_names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    names.iter().map(|name| Column::new(name)).collect()
}

/// Columns straight from a list of names, keeping their order.
pub fn columns_from_names(names: &[String]) -> Vec<Column> {
    names.iter().map(|name| Column::new(name)).collect()
}

fn default_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c == '_' || c == '-' {
            label.push(' ');
            upper = true;
        } else if upper {
            label.extend(c.to_uppercase());
            upper = false;
        } else {
            label.push(c);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use crate::models::Value;

    fn record(fields: &[(&str, Value)]) -> Record {
        Record::new(
            fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn labels_derive_from_names() {
        assert_eq!(Column::new("age").label, "Age");
        assert_eq!(Column::new("first_name").label, "First Name");
        assert_eq!(Column::new("created-at").label, "Created At");
    }

    #[test]
    fn comparator_override_changes_order() {
        let column = Column::new("name").with_comparator(base_comparator("nocase").unwrap());
        let cmp = column.make_comparator(Some(-1)).unwrap();
        let a = record(&[("name", Value::Text("a".to_string()))]);
        let b = record(&[("name", Value::Text("B".to_string()))]);
        // Byte order would put "B" first; case folding reverses that.
        assert_eq!(cmp(&a, &b), std::cmp::Ordering::Less);
    }

    #[test]
    fn value_extractor_override_feeds_the_comparator() {
        let column = Column::new("age").with_value(Arc::new(|record, attr| {
            match record.get(attr) {
                Value::Integer(v) => Value::Integer(-v),
                other => other,
            }
        }));
        let cmp = column.make_comparator(Some(-1)).unwrap();
        let young = record(&[("age", Value::Integer(10))]);
        let old = record(&[("age", Value::Integer(60))]);
        // Negated ages: ascending now puts the oldest first.
        assert_eq!(cmp(&old, &young), std::cmp::Ordering::Less);
    }

    #[test]
    fn auto_sortable_tracks_the_context_record() {
        let spec: ColumnSpec =
            serde_json::from_str(r#"{"name": "age", "sortable": "auto"}"#).unwrap();
        let column = spec.into_column().unwrap();

        let with_value = record(&[("age", Value::Integer(3))]);
        let without = record(&[("age", Value::Null)]);

        assert!(column.is_sortable(&SortContext {
            column: &column,
            record: Some(&with_value),
        }));
        assert!(!column.is_sortable(&SortContext {
            column: &column,
            record: Some(&without),
        }));
        assert!(!column.is_sortable(&SortContext {
            column: &column,
            record: None,
        }));
    }

    #[test]
    fn unknown_sortable_mode_is_rejected() {
        let spec: ColumnSpec =
            serde_json::from_str(r#"{"name": "age", "sortable": "sometimes"}"#).unwrap();
        assert!(matches!(
            spec.into_column(),
            Err(GridError::InvalidSortable(s)) if s == "sometimes"
        ));
    }

    #[test]
    fn unknown_comparator_name_is_rejected() {
        let spec: ColumnSpec =
            serde_json::from_str(r#"{"name": "age", "comparator": "bogus"}"#).unwrap();
        assert!(matches!(
            spec.into_column(),
            Err(GridError::UnknownComparator(s)) if s == "bogus"
        ));
    }

    #[test]
    fn derived_columns_cover_all_fields() {
        let records = vec![
            record(&[("b", Value::Integer(1))]),
            record(&[("a", Value::Integer(2)), ("c", Value::Integer(3))]),
        ];
        let columns = derive_columns(&records);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
