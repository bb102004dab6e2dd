//! # SQLite driver adapter
//!
//! This crate defines a driver factory that lets a connection pool drive an
//! in-process SQLite database through a pool-client interface. A driver
//! adapter wraps an already-initialized engine handle and exposes the client
//! lifecycle the pool expects (`connect`, `query`, `end`, `stream`), plus the
//! result shape it expects (rows, field metadata, row count, command tag).
//!
//! The adapter is a pass-through with one reshaping step: statements and
//! positional parameters are forwarded to the engine as-is, and the engine's
//! native response is reshaped into a [`QueryResult`]. There is no pooling
//! policy, no retry logic, and no transaction machinery in here; those belong
//! to the pool and the engine respectively.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqlite_driver_adapter::{create_driver_factory, SqliteEngine};
//!
//! # async fn run() -> sqlite_driver_adapter::Result<()> {
//! let engine = Arc::new(SqliteEngine::in_memory()?);
//! let factory = create_driver_factory(engine);
//!
//! let client = factory.create_pool_client().await?;
//! client.connect().await;
//!
//! let result = client.query("select 'Hello world' as message", &[]).await?;
//! assert_eq!(result.row_count, 1);
//!
//! client.end().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod driver;
pub mod engine;
pub mod error;
pub mod types;

pub use client::{ClientEvent, PoolClient, RowStream};
pub use driver::{create_driver_factory, DriverFactory};
pub use engine::{sqlite::SqliteEngine, Engine, EngineField, EngineResultSet};
pub use error::{Error, Result};
pub use types::{Field, QueryResult, Row};
