//! The driver factory handed to the pool's connection-acquisition machinery.

use std::sync::Arc;

use crate::client::PoolClient;
use crate::engine::Engine;

/// Creates a driver factory from an already-initialized engine handle.
///
/// The caller owns the engine for its entire lifetime; the factory and the
/// clients it produces only forward calls to it.
pub fn create_driver_factory(engine: Arc<dyn Engine>) -> DriverFactory {
    DriverFactory::new(engine)
}

/// Produces pool clients for one engine handle.
pub struct DriverFactory {
    engine: Arc<dyn Engine>,
}

impl DriverFactory {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Yields a new pool client sharing this factory's engine handle.
    ///
    /// May be called any number of times. Each client carries its own
    /// advisory connected flag and event channel; the engine itself decides
    /// how concurrent statements are serialized.
    pub async fn create_pool_client(&self) -> crate::Result<PoolClient> {
        Ok(PoolClient::new(Arc::clone(&self.engine)))
    }
}
