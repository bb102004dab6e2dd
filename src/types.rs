use serde::Serialize;

use crate::engine::EngineResultSet;

/// A single result row, keeping the engine's column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Metadata for one result column.
///
/// The engine reports its own field-level type identifier; the adapter renames
/// it into the `dataTypeId` key the pool expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub data_type_id: i64,
}

/// The result shape handed back to the pool.
///
/// Serializes to `{ command, fields: [{ name, dataTypeId }], rows, rowCount }`,
/// the exact field names the consuming pool reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Tag describing the statement kind, taken verbatim from the engine.
    pub command: String,
    /// Field metadata, one entry per result column for every row.
    pub fields: Vec<Field>,
    /// Result rows, passed through from the engine unchanged.
    pub rows: Vec<Row>,
    /// Rows returned if any, otherwise rows affected, otherwise zero.
    pub row_count: u64,
}

impl From<EngineResultSet> for QueryResult {
    fn from(result: EngineResultSet) -> Self {
        let row_count = if result.rows.is_empty() {
            result.affected_rows.unwrap_or(0)
        } else {
            result.rows.len() as u64
        };

        let fields = result
            .fields
            .into_iter()
            .map(|field| Field {
                name: field.name,
                data_type_id: field.type_id,
            })
            .collect();

        Self {
            command: result.command,
            fields,
            rows: result.rows,
            row_count,
        }
    }
}
