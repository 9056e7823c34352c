//! bot-provision
//!
//! One-shot provisioning for the Telegram summary bot on Cloudflare Workers:
//! D1 database, wrangler.toml binding, schema, worker deploy, bot token
//! secret and Telegram webhook.

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod infrastructure;
mod secrets;
mod services;
mod tools;
mod ui;

use cli::{Cli, Commands};
use commands::{bind_database, deploy, set_webhook};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false) // Disable ANSI escape codes for cleaner output
        .init();

    let result = match cli.command {
        Commands::Deploy { settings, secret } => deploy::execute(settings, secret).await,
        Commands::BindDatabase {
            database_id,
            settings,
        } => bind_database::execute(database_id, settings).await,
        Commands::SetWebhook {
            url,
            settings,
            secret,
        } => set_webhook::execute(url, settings, secret).await,
    };

    exit_code(&result)
}

/// Log a failure once and map it to the process exit status
fn exit_code(result: &anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Provisioning failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
