//! CLI definitions for bot-provision
//!
//! This module contains all CLI argument parsing structures using clap.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{
    ProvisionSettings, DEFAULT_API_BASE, DEFAULT_BINDING, DEFAULT_CONFIG_PATH,
    DEFAULT_DATABASE_NAME, DEFAULT_SCHEMA_PATH, DEFAULT_SECRET_NAME,
};
use crate::secrets::{EnvSecret, FileSecret, PromptSecret, SecretProvider};

#[derive(Parser)]
#[command(
    name = "bot-provision",
    version,
    about = "Provision the Telegram summary bot on Cloudflare Workers",
    long_about = "Creates the D1 database, wires it into wrangler.toml, applies the schema,\n\
                  deploys the worker, stores the bot token and registers the Telegram webhook."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full provisioning flow (not idempotent: creates a new database)
    Deploy {
        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        secret: SecretArgs,
    },

    /// Point wrangler.toml's D1 binding at an existing database
    BindDatabase {
        /// ID printed by `wrangler d1 create`
        #[arg(long)]
        database_id: String,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Register the Telegram webhook for an already deployed worker
    SetWebhook {
        /// Public worker URL (https)
        #[arg(long)]
        url: String,

        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        secret: SecretArgs,
    },
}

/// Names and paths shared by every command
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Worker project directory (wrangler runs here)
    #[arg(long, env = "BOT_WORKING_DIR", default_value = ".")]
    pub working_dir: PathBuf,

    /// wrangler.toml path, relative to the working directory
    #[arg(long, env = "WRANGLER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Schema file applied with `wrangler d1 execute`
    #[arg(long, env = "BOT_SCHEMA_FILE", default_value = DEFAULT_SCHEMA_PATH)]
    pub schema: String,

    /// D1 database name
    #[arg(long, env = "BOT_DATABASE_NAME", default_value = DEFAULT_DATABASE_NAME)]
    pub database_name: String,

    /// Binding name the worker uses for the database
    #[arg(long, env = "BOT_DATABASE_BINDING", default_value = DEFAULT_BINDING)]
    pub binding: String,

    /// Worker secret holding the bot token
    #[arg(long, env = "BOT_SECRET_NAME", default_value = DEFAULT_SECRET_NAME)]
    pub secret_name: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Run wrangler via `npx wrangler` instead of WRANGLER_BIN / PATH
    #[arg(long, env = "BOT_USE_NPX")]
    pub npx: bool,
}

impl SettingsArgs {
    pub fn to_settings(&self) -> ProvisionSettings {
        ProvisionSettings {
            config_path: self.config.clone(),
            schema_path: self.schema.clone(),
            database_name: self.database_name.clone(),
            binding: self.binding.clone(),
            secret_name: self.secret_name.clone(),
            api_base: self.api_base.clone(),
            ..ProvisionSettings::in_dir(&self.working_dir)
        }
    }
}

/// Where the bot token comes from
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretSource {
    /// Masked terminal prompt
    #[default]
    Prompt,
    /// Environment variable named by --secret-env
    Env,
    /// File named by --secret-file
    File,
}

#[derive(Args, Debug, Clone)]
pub struct SecretArgs {
    /// Bot token source
    #[arg(long, value_enum, default_value_t = SecretSource::Prompt)]
    pub secret_source: SecretSource,

    /// Environment variable read with --secret-source env
    #[arg(long, default_value = DEFAULT_SECRET_NAME)]
    pub secret_env: String,

    /// File read with --secret-source file
    #[arg(long, required_if_eq("secret_source", "file"))]
    pub secret_file: Option<PathBuf>,
}

impl SecretArgs {
    pub fn provider(&self) -> Result<Box<dyn SecretProvider>> {
        Ok(match self.secret_source {
            SecretSource::Prompt => Box::new(PromptSecret::default()),
            SecretSource::Env => Box::new(EnvSecret::new(self.secret_env.as_str())),
            SecretSource::File => match &self.secret_file {
                Some(path) => Box::new(FileSecret::new(path.clone())),
                None => bail!("--secret-file is required with --secret-source file"),
            },
        })
    }
}
