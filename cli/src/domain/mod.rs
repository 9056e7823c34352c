//! Domain layer - pure provisioning logic
//!
//! This module contains logic with no external I/O.
//! Types and functions here can be unit tested without mocking.

pub mod extract;
pub mod resource;
pub mod step;
pub mod webhook;

// Re-export commonly used types
pub use extract::{parse_database_id, parse_worker_url};
pub use resource::{DatabaseBinding, DatabaseId, WorkerUrl};
pub use step::ProvisionStep;
pub use webhook::{redact_token, webhook_url};
