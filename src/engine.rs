//! The seam between the adapter and the embedded engine.
//!
//! The pool client only ever talks to the [`Engine`] trait; the engine handle
//! it holds is caller-supplied and opaque. The crate ships one binding,
//! [`sqlite::SqliteEngine`], which runs statements on an in-process SQLite
//! database.

pub mod sqlite;

use async_trait::async_trait;

use crate::types::Row;

/// Field metadata as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineField {
    pub name: String,
    pub type_id: i64,
}

/// The engine's native response to a single statement.
#[derive(Debug, Clone)]
pub struct EngineResultSet {
    /// Tag identifying the kind of statement executed, e.g. `SELECT`.
    pub command: String,
    /// One entry per result column, present even when no rows came back.
    pub fields: Vec<EngineField>,
    /// The result rows, in the order the engine produced them.
    pub rows: Vec<Row>,
    /// Rows affected by a data-modifying statement that returned no rows.
    /// `None` for statements that neither return rows nor mutate data.
    pub affected_rows: Option<u64>,
}

/// An in-process engine that can execute one parameterized SQL statement at a
/// time.
///
/// Implementations are responsible for their own serialization of concurrent
/// statements; the adapter imposes no locking or queuing of its own.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Execute a statement given as SQL, interpolating the given parameters,
    /// and return the engine's native result shape.
    async fn query_raw(&self, sql: &str, params: &[serde_json::Value])
        -> crate::Result<EngineResultSet>;
}
