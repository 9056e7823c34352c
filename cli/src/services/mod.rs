//! Services layer - orchestration logic
//!
//! This module coordinates between domain logic and infrastructure.
//! Services use infrastructure adapters to perform I/O operations.

pub mod provision_service;

// Re-export commonly used types
pub use provision_service::{register_webhook, remind, ProvisionService, WebhookOutcome};
