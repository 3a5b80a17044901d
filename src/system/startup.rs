//! Startup chores shared by server mode.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::Result;
use crate::storage::SeaOrmStorage;
use crate::system::cleanup::spawn_cleanup_task;

/// Bootstrap the admin account and start the background tasks.
pub async fn prepare_server(config: &Config, storage: &Arc<SeaOrmStorage>) -> Result<()> {
    storage
        .ensure_admin(&config.api.admin_email, &config.api.admin_password)
        .await?;

    spawn_cleanup_task(
        Arc::clone(storage),
        config.checkout.cleanup_interval_seconds,
    );

    Ok(())
}
