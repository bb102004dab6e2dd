//! The pool client: connect, query, end, and the intentionally absent stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::BoxStream;
use tokio::sync::broadcast;
use tracing::{info_span, Instrument};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::types::{QueryResult, Row};

/// Events emitted on a client's event channel.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// An engine failure observed during `query`. The identical error is also
    /// returned to the direct caller; the event is a side-channel for
    /// observers, not a replacement for propagation.
    Error(Error),
}

/// The stream of rows `stream` would yield if the engine supported streaming.
pub type RowStream = BoxStream<'static, Result<Row>>;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// A client executing statements against one shared engine handle.
///
/// The `connected` flag mirrors the connection lifecycle the pool expects. The
/// embedded engine has no connect/disconnect concept, so the flag is purely
/// advisory and gates nothing.
pub struct PoolClient {
    engine: Arc<dyn Engine>,
    connected: AtomicBool,
    events: broadcast::Sender<ClientEvent>,
}

impl PoolClient {
    pub(crate) fn new(engine: Arc<dyn Engine>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            engine,
            connected: AtomicBool::new(false),
            events,
        }
    }

    /// Marks the client connected. Performs no I/O and never fails.
    pub async fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    /// Marks the client disconnected. Performs no I/O and never fails.
    pub async fn end(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Whether the client is marked connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Subscribes to this client's event channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Forwards the statement and parameters to the engine and reshapes the
    /// response into a [`QueryResult`].
    ///
    /// On engine failure the error is first emitted on the event channel, then
    /// returned to the caller. Emitting with no subscribers is a no-op.
    pub async fn query(&self, sql: &str, params: &[serde_json::Value]) -> Result<QueryResult> {
        let span = info_span!("adapter:query", statement = %sql);

        match self.engine.query_raw(sql, params).instrument(span).await {
            Ok(result) => Ok(QueryResult::from(result)),
            Err(error) => {
                let _ = self.events.send(ClientEvent::Error(error.clone()));
                Err(error)
            }
        }
    }

    /// Always fails: the embedded engine has no server-side cursor mode.
    ///
    /// The failure is synchronous, before any engine I/O, rather than a
    /// lazily-failing stream.
    pub fn stream(&self, _sql: &str, _params: &[serde_json::Value]) -> Result<RowStream> {
        Err(Error::StreamingNotSupported)
    }
}
