//! Rebind wrangler.toml to an existing D1 database
//!
//! Recovery path for a run that created the database but failed later:
//! re-running `deploy` would create a second database.

use anyhow::{Context, Result};

use crate::cli::SettingsArgs;
use crate::domain::DatabaseId;
use crate::services::ProvisionService;

use super::{telegram_client, wrangler_client};

pub async fn execute(database_id: String, settings: SettingsArgs) -> Result<()> {
    let service = ProvisionService::new(
        settings.to_settings(),
        wrangler_client(&settings),
        telegram_client(),
    );

    service
        .bind_database(&DatabaseId::new(database_id))
        .context("Failed to update D1 binding")?;

    Ok(())
}
