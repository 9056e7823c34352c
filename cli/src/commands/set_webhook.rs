//! Register the Telegram webhook for an already deployed worker

use anyhow::{Context, Result};

use crate::cli::{SecretArgs, SettingsArgs};
use crate::domain::WorkerUrl;
use crate::error::ProvisionError;
use crate::secrets::validate_token;
use crate::services::{register_webhook, remind, WebhookOutcome};

use super::telegram_client;

pub async fn execute(url: String, settings: SettingsArgs, secret: SecretArgs) -> Result<()> {
    // Telegram only delivers to HTTPS endpoints
    if !url.starts_with("https://") {
        return Err(ProvisionError::Validation(format!(
            "webhook target must be an https URL, got {}",
            url
        ))
        .into());
    }

    let provider = secret.provider()?;
    let token = validate_token(&provider.fetch()?).context("Invalid bot token")?;

    let outcome = register_webhook(
        &telegram_client(),
        &settings.api_base,
        &token,
        &WorkerUrl::new(url),
    )
    .await;
    remind();

    // Registering is this command's only job, so a fallback is a failure here
    match outcome {
        WebhookOutcome::Registered(_) => Ok(()),
        WebhookOutcome::ManualFallback { reason, .. } => {
            Err(anyhow::anyhow!(reason)).context("Webhook registration failed")
        }
    }
}
