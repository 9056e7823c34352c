//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that interacts with external systems:
//! - Cloudflare (D1, Workers, secrets) via the wrangler CLI
//! - Telegram Bot API

pub mod telegram;
pub mod wrangler;

// Re-export commonly used types
pub use telegram::{TelegramClient, WebhookApi};
pub use wrangler::{CloudTool, WranglerClient};
