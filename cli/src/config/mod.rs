//! # Provisioning Configuration
//!
//! Two kinds of configuration live here:
//!
//! 1. **Settings** ([`ProvisionSettings`]) - names and paths the flow uses.
//!    Defaults match the summary bot's repository layout; every field can be
//!    overridden from the command line or environment (see `cli.rs`).
//!
//! 2. **Service configuration** (`wrangler.toml`) - the worker's own config,
//!    rewritten in place once the D1 database exists (see [`wrangler`]).

pub mod wrangler;

pub use wrangler::rewrite_database_binding;

use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE_NAME: &str = "telegram-summary-bot";
pub const DEFAULT_BINDING: &str = "DB";
pub const DEFAULT_SCHEMA_PATH: &str = "./schema.sql";
pub const DEFAULT_CONFIG_PATH: &str = "wrangler.toml";
pub const DEFAULT_SECRET_NAME: &str = "TELEGRAM_BOT_TOKEN";
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Settings for one provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    /// Directory wrangler runs in; relative paths resolve against it
    pub working_dir: PathBuf,
    /// wrangler.toml, relative to `working_dir` unless absolute
    pub config_path: PathBuf,
    /// Passed to `wrangler d1 execute --file` verbatim
    pub schema_path: String,
    pub database_name: String,
    pub binding: String,
    /// Worker secret the bot token is stored under
    pub secret_name: String,
    /// Telegram Bot API base URL
    pub api_base: String,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            schema_path: DEFAULT_SCHEMA_PATH.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            binding: DEFAULT_BINDING.to_string(),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ProvisionSettings {
    /// Settings rooted at a different working directory
    pub fn in_dir(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Resolved path of wrangler.toml
    pub fn config_file(&self) -> PathBuf {
        if self.config_path.is_absolute() {
            self.config_path.clone()
        } else {
            self.working_dir.join(&self.config_path)
        }
    }
}
