//! An embedded engine binding running statements on an in-process SQLite
//! database through `rusqlite`.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Statement;
use tokio::sync::Mutex;
use tracing::debug;

use super::{Engine, EngineField, EngineResultSet};
use crate::types::Row;

/// Field type identifiers reported by the SQLite engine, following SQLite's
/// fundamental datatype codes. Columns whose declared type maps to no
/// fundamental datatype report [`type_id::UNKNOWN`].
pub mod type_id {
    pub const UNKNOWN: i64 = 0;
    pub const INTEGER: i64 = 1;
    pub const FLOAT: i64 = 2;
    pub const TEXT: i64 = 3;
    pub const BLOB: i64 = 4;
}

/// An in-process SQLite database usable as the adapter's engine handle.
///
/// The connection is guarded by a mutex, so statements issued through any
/// number of pool clients sharing this handle execute one at a time. That
/// serialization belongs to the engine; the adapter on top of it holds no
/// locks.
pub struct SqliteEngine {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteEngine {
    /// Opens a fresh in-memory database.
    pub fn in_memory() -> crate::Result<Self> {
        Ok(Self::from_connection(rusqlite::Connection::open_in_memory()?))
    }

    /// Opens or creates a database file at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        Ok(Self::from_connection(rusqlite::Connection::open(path)?))
    }

    /// Wraps an already-open connection. The caller keeps ownership of the
    /// database lifecycle decisions; the engine never closes it early.
    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Engine for SqliteEngine {
    async fn query_raw(
        &self,
        sql: &str,
        params: &[serde_json::Value],
    ) -> crate::Result<EngineResultSet> {
        let conn = self.conn.lock().await;
        let command = command_tag(sql);

        debug!(command = %command, statement = %sql, "executing statement");

        let mut stmt = conn.prepare_cached(sql)?;

        for (i, param) in params.iter().enumerate() {
            bind_parameter(&mut stmt, i + 1, param)?;
        }

        if stmt.column_count() == 0 {
            let changes = stmt.raw_execute()?;
            let affected_rows = is_dml(&command).then_some(changes as u64);

            return Ok(EngineResultSet {
                command,
                fields: Vec::new(),
                rows: Vec::new(),
                affected_rows,
            });
        }

        let fields: Vec<EngineField> = stmt
            .columns()
            .iter()
            .map(|column| EngineField {
                name: column.name().to_string(),
                type_id: column_type_id(column.decl_type()),
            })
            .collect();

        let mut rows = Vec::new();
        let mut raw_rows = stmt.raw_query();

        while let Some(raw_row) = raw_rows.next()? {
            let mut row = Row::new();

            for (i, field) in fields.iter().enumerate() {
                row.insert(field.name.clone(), json_value(raw_row.get_ref(i)?));
            }

            rows.push(row);
        }

        Ok(EngineResultSet {
            command,
            fields,
            rows,
            affected_rows: None,
        })
    }
}

/// Derives the command tag from the first keyword of the statement.
fn command_tag(sql: &str) -> String {
    sql.split_whitespace()
        .next()
        .map(|keyword| keyword.trim_end_matches(';').to_uppercase())
        .filter(|keyword| !keyword.is_empty())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Only data-modifying statements report an affected-row count. SQLite's
/// change counter is sticky across other statement kinds, so consulting it
/// after DDL or transaction control would report a stale value.
fn is_dml(command: &str) -> bool {
    matches!(command, "INSERT" | "UPDATE" | "DELETE" | "REPLACE")
}

/// Maps a declared column type to a fundamental datatype code using SQLite's
/// type affinity rules. Undeclared columns, such as expressions, report
/// [`type_id::UNKNOWN`].
fn column_type_id(decl_type: Option<&str>) -> i64 {
    let Some(decl) = decl_type else {
        return type_id::UNKNOWN;
    };

    let decl = decl.to_uppercase();

    if decl.contains("INT") {
        type_id::INTEGER
    } else if decl.contains("CHAR") || decl.contains("CLOB") || decl.contains("TEXT") {
        type_id::TEXT
    } else if decl.contains("BLOB") {
        type_id::BLOB
    } else if decl.contains("REAL") || decl.contains("FLOA") || decl.contains("DOUB") {
        type_id::FLOAT
    } else {
        type_id::UNKNOWN
    }
}

fn bind_parameter(
    stmt: &mut Statement<'_>,
    index: usize,
    param: &serde_json::Value,
) -> crate::Result<()> {
    use serde_json::Value;

    match param {
        Value::Null => stmt.raw_bind_parameter(index, rusqlite::types::Null)?,
        Value::Bool(b) => stmt.raw_bind_parameter(index, b)?,
        Value::Number(n) => match n.as_i64() {
            Some(i) => stmt.raw_bind_parameter(index, i)?,
            None => stmt.raw_bind_parameter(index, n.as_f64())?,
        },
        Value::String(s) => stmt.raw_bind_parameter(index, s.as_str())?,
        // Structured values bind as their JSON text.
        other => stmt.raw_bind_parameter(index, other.to_string())?,
    }

    Ok(())
}

fn json_value(value: ValueRef<'_>) -> serde_json::Value {
    use serde_json::Value;

    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => Value::String(hex::encode(blob)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tag_takes_the_first_keyword() {
        assert_eq!(command_tag("select 1"), "SELECT");
        assert_eq!(command_tag("  INSERT into t values (1)"), "INSERT");
        assert_eq!(command_tag("begin;"), "BEGIN");
        assert_eq!(command_tag(""), "UNKNOWN");
    }

    #[test]
    fn column_type_ids_follow_affinity_rules() {
        assert_eq!(column_type_id(Some("INTEGER")), type_id::INTEGER);
        assert_eq!(column_type_id(Some("tinyint")), type_id::INTEGER);
        assert_eq!(column_type_id(Some("VARCHAR(255)")), type_id::TEXT);
        assert_eq!(column_type_id(Some("TEXT")), type_id::TEXT);
        assert_eq!(column_type_id(Some("BLOB")), type_id::BLOB);
        assert_eq!(column_type_id(Some("DOUBLE PRECISION")), type_id::FLOAT);
        assert_eq!(column_type_id(None), type_id::UNKNOWN);
    }

    #[test]
    fn values_convert_to_json() {
        assert_eq!(json_value(ValueRef::Null), serde_json::Value::Null);
        assert_eq!(json_value(ValueRef::Integer(42)), serde_json::json!(42));
        assert_eq!(json_value(ValueRef::Real(1.5)), serde_json::json!(1.5));
        assert_eq!(
            json_value(ValueRef::Text(b"Musti")),
            serde_json::json!("Musti")
        );
        assert_eq!(
            json_value(ValueRef::Blob(&[0xde, 0xad])),
            serde_json::json!("dead")
        );
    }

    #[tokio::test]
    async fn insert_reports_affected_rows_without_fields() {
        let engine = SqliteEngine::in_memory().unwrap();

        engine
            .query_raw("create table pets (id integer primary key, name text)", &[])
            .await
            .unwrap();

        let result = engine
            .query_raw("insert into pets (name) values ('Musti'), ('Naukio')", &[])
            .await
            .unwrap();

        assert_eq!(result.command, "INSERT");
        assert!(result.fields.is_empty());
        assert!(result.rows.is_empty());
        assert_eq!(result.affected_rows, Some(2));
    }

    #[tokio::test]
    async fn ddl_reports_no_affected_rows() {
        let engine = SqliteEngine::in_memory().unwrap();

        let result = engine
            .query_raw("create table pets (id integer primary key)", &[])
            .await
            .unwrap();

        assert_eq!(result.command, "CREATE");
        assert_eq!(result.affected_rows, None);
    }

    #[tokio::test]
    async fn select_reports_fields_even_without_rows() {
        let engine = SqliteEngine::in_memory().unwrap();

        engine
            .query_raw("create table pets (id integer primary key, name text)", &[])
            .await
            .unwrap();

        let result = engine.query_raw("select id, name from pets", &[]).await.unwrap();

        assert_eq!(
            result.fields,
            vec![
                EngineField {
                    name: "id".to_string(),
                    type_id: type_id::INTEGER,
                },
                EngineField {
                    name: "name".to_string(),
                    type_id: type_id::TEXT,
                },
            ]
        );
        assert!(result.rows.is_empty());
        assert_eq!(result.affected_rows, None);
    }

    #[tokio::test]
    async fn parameters_bind_positionally() {
        let engine = SqliteEngine::in_memory().unwrap();

        engine
            .query_raw("create table pets (name text, age integer)", &[])
            .await
            .unwrap();

        engine
            .query_raw(
                "insert into pets (name, age) values (?1, ?2)",
                &[serde_json::json!("Musti"), serde_json::json!(9)],
            )
            .await
            .unwrap();

        let result = engine
            .query_raw(
                "select age from pets where name = ?1",
                &[serde_json::json!("Musti")],
            )
            .await
            .unwrap();

        assert_eq!(result.rows[0]["age"], serde_json::json!(9));
    }
}
