pub mod bind_database;
pub mod deploy;
pub mod set_webhook;

use crate::cli::SettingsArgs;
use crate::infrastructure::{TelegramClient, WranglerClient};

fn wrangler_client(settings: &SettingsArgs) -> WranglerClient {
    if settings.npx {
        WranglerClient::via_npx(&settings.working_dir)
    } else {
        WranglerClient::new(&settings.working_dir)
    }
}

fn telegram_client() -> TelegramClient {
    TelegramClient::new()
}
