//! Background purge of expired checkout reservations.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::storage::SeaOrmStorage;

/// Spawn the periodic cleanup task. Unpaid orders whose reservation
/// windows have fully elapsed are deleted and their stock returned.
pub fn spawn_cleanup_task(storage: Arc<SeaOrmStorage>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));
        // The first tick fires immediately; skip it so startup stays quiet.
        interval.tick().await;

        loop {
            interval.tick().await;
            match storage.cleanup_expired_orders().await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "expired unpaid orders purged"),
                Err(e) => error!("order cleanup failed: {}", e),
            }
        }
    });

    info!(interval_seconds, "order cleanup task started");
}
