//! SQLite record source
//!
//! Serves read-only pages from one table. Sorting happens in SQL: the
//! fetch worker passes the collection's sort parameters and they become
//! an ORDER BY clause here.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};

use crate::grid::Direction;
use crate::models::{Record, Value};

use super::collection::SortParams;
use super::remote::{FetchRequest, FetchedPage};

pub struct SqliteSource {
    conn: Mutex<Connection>,
    table: String,
    columns: Vec<String>,
}

impl SqliteSource {
    /// Open the database (`:memory:` supported) and verify the table
    /// exists.
    pub fn open(path: &str, table: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        Self::with_connection(conn, table)
    }

    pub(crate) fn with_connection(conn: Connection, table: &str) -> Result<Self> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        if count == 0 {
            bail!("no such table: {}", table);
        }

        let columns = {
            let query = format!("PRAGMA table_info({})", quote_ident(table));
            let mut stmt = conn.prepare(&query)?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

            let mut names = Vec::new();
            for row in rows {
                names.push(row?);
            }
            names
        };

        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
            columns,
        })
    }

    /// Column names in table order, read once at open time.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fetch one page plus the total row count. A request without a
    /// sort direction omits ORDER BY and keeps rowid order; a sort
    /// naming a column the table lacks is an error.
    pub fn fetch_page(&self, request: &FetchRequest) -> Result<FetchedPage> {
        let conn = self.conn.lock().unwrap();

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(&self.table)),
            [],
            |row| row.get(0),
        )?;

        let mut sql = format!("SELECT * FROM {}", quote_ident(&self.table));
        if let Some(sort) = request.sort.as_ref() {
            if let Some(order) = order_clause(sort, &self.columns)? {
                sql.push_str(&order);
            }
        }
        sql.push_str(" LIMIT ?1 OFFSET ?2");

        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let offset = request.page * request.page_size;
        let rows = stmt.query_map(
            params![request.page_size as i64, offset as i64],
            |row| Ok(row_to_record(row, &columns)),
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(FetchedPage {
            generation: request.generation,
            records,
            total: total as usize,
        })
    }
}

fn order_clause(sort: &SortParams, columns: &[String]) -> Result<Option<String>> {
    let keyword = match sort.direction {
        Direction::Ascending => "ASC",
        Direction::Descending => "DESC",
        Direction::None => return Ok(None),
    };
    // SQLite reads an unresolvable quoted identifier as a string
    // literal, so a bad column would order by a constant instead of
    // failing.
    if !columns.iter().any(|name| name == &sort.column) {
        bail!("no such column: {}", sort.column);
    }
    Ok(Some(format!(
        " ORDER BY {} {}",
        quote_ident(&sort.column),
        keyword
    )))
}

fn row_to_record(row: &Row, columns: &[String]) -> Record {
    let mut fields = HashMap::new();
    for (i, name) in columns.iter().enumerate() {
        let value = match row.get_ref(i) {
            Ok(ValueRef::Null) => Value::Null,
            Ok(ValueRef::Integer(v)) => Value::Integer(v),
            Ok(ValueRef::Real(v)) => Value::Float(v),
            Ok(ValueRef::Text(v)) => Value::Text(String::from_utf8_lossy(v).into_owned()),
            Ok(ValueRef::Blob(_)) => Value::Text("<blob>".to_string()),
            Err(_) => Value::Null,
        };
        fields.insert(name.clone(), value);
    }
    Record::new(fields)
}

/// Quote an identifier for direct inclusion in SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteSource {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE people (name TEXT, age INTEGER);
             INSERT INTO people VALUES ('carol', 30), ('alice', 10), ('bob', 20);",
        )
        .unwrap();
        SqliteSource::with_connection(conn, "people").unwrap()
    }

    fn fetch(source: &SqliteSource, page: usize, page_size: usize, sort: Option<SortParams>) -> FetchedPage {
        source
            .fetch_page(&FetchRequest {
                generation: 1,
                page,
                page_size,
                sort,
            })
            .unwrap()
    }

    fn names(page: &FetchedPage) -> Vec<String> {
        page.records
            .iter()
            .map(|record| record.get("name").to_string())
            .collect()
    }

    #[test]
    fn missing_table_is_rejected() {
        let err = SqliteSource::open(":memory:", "nope").err().unwrap();
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn columns_come_back_in_table_order() {
        let source = seeded();
        assert_eq!(source.columns(), ["name", "age"]);
    }

    #[test]
    fn unsorted_fetch_keeps_insert_order() {
        let source = seeded();
        let page = fetch(&source, 0, 10, None);
        assert_eq!(page.total, 3);
        assert_eq!(names(&page), vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn sorted_fetch_orders_in_sql() {
        let source = seeded();
        let ascending = fetch(
            &source,
            0,
            10,
            Some(SortParams {
                column: "age".to_string(),
                direction: Direction::Ascending,
            }),
        );
        assert_eq!(names(&ascending), vec!["alice", "bob", "carol"]);

        let descending = fetch(
            &source,
            0,
            10,
            Some(SortParams {
                column: "age".to_string(),
                direction: Direction::Descending,
            }),
        );
        assert_eq!(names(&descending), vec!["carol", "bob", "alice"]);
    }

    #[test]
    fn sort_on_an_unknown_column_is_rejected() {
        let source = seeded();
        let err = source
            .fetch_page(&FetchRequest {
                generation: 1,
                page: 0,
                page_size: 10,
                sort: Some(SortParams {
                    column: "height".to_string(),
                    direction: Direction::Ascending,
                }),
            })
            .unwrap_err();
        assert!(err.to_string().contains("no such column"));
    }

    #[test]
    fn cleared_sort_omits_order_by() {
        let source = seeded();
        let page = fetch(
            &source,
            0,
            10,
            Some(SortParams {
                column: "age".to_string(),
                direction: Direction::None,
            }),
        );
        assert_eq!(names(&page), vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn pages_respect_limit_and_offset() {
        let source = seeded();
        let sort = SortParams {
            column: "age".to_string(),
            direction: Direction::Ascending,
        };
        let first = fetch(&source, 0, 2, Some(sort.clone()));
        assert_eq!(names(&first), vec!["alice", "bob"]);

        let second = fetch(&source, 1, 2, Some(sort));
        assert_eq!(names(&second), vec!["carol"]);
        assert_eq!(second.total, 3);
    }

    #[test]
    fn quoted_identifiers_survive_keywords_and_quotes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE \"order\" (\"group\" INTEGER);
             INSERT INTO \"order\" VALUES (2), (1);",
        )
        .unwrap();
        let source = SqliteSource::with_connection(conn, "order").unwrap();

        let page = fetch(
            &source,
            0,
            10,
            Some(SortParams {
                column: "group".to_string(),
                direction: Direction::Ascending,
            }),
        );
        assert_eq!(page.records[0].get("group"), Value::Integer(1));

        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
