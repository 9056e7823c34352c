//! Full provisioning flow

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{SecretArgs, SettingsArgs};
use crate::domain::ProvisionStep;
use crate::services::{ProvisionService, WebhookOutcome};
use crate::ui;

use super::{telegram_client, wrangler_client};

pub async fn execute(settings: SettingsArgs, secret: SecretArgs) -> Result<()> {
    ui::print_header("Telegram Bot Deployment");

    let provider = secret.provider()?;
    let service = ProvisionService::new(
        settings.to_settings(),
        wrangler_client(&settings),
        telegram_client(),
    );

    info!("🎯 Database: {}", service.settings().database_name);
    info!("📝 Config: {}", service.settings().config_file().display());

    let report = service
        .run(provider.as_ref())
        .await
        .context("Deployment aborted")?;

    info!(
        "Completed {}/{} steps",
        report.completed.len(),
        ProvisionStep::ALL.len()
    );

    println!();
    match &report.webhook {
        WebhookOutcome::Registered(body) => {
            debug!("setWebhook response: {}", body);
            ui::print_success(&format!(
                "Bot deployed at {} (database {})",
                report.worker_url, report.database_id
            ));
        }
        WebhookOutcome::ManualFallback { reason, .. } => {
            ui::print_warning(&format!(
                "Bot deployed at {} (database {}), but the webhook was not registered ({})",
                report.worker_url, report.database_id, reason
            ));
            if let Some(url) = report.webhook.manual_url() {
                ui::print_warning(&format!("Open this URL to finish: {}", url));
            }
        }
    }

    Ok(())
}
