//! Centralized error types for bot-provision
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Top-level error type for provisioning operations
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Expected pattern missing from an external tool's output
    #[error("Failed to extract {what} from output (pattern: {pattern})")]
    Extraction { what: String, pattern: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// External command exited non-zero or could not be spawned
    #[error("Command `{command}` failed ({status}): {stderr}")]
    ExternalTool {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Webhook request failed: {0}")]
    Network(String),

    #[error("Service configuration error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Secret unavailable: {0}")]
    Secret(String),
}

impl ProvisionError {
    pub fn extraction(what: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Extraction {
            what: what.into(),
            pattern: pattern.into(),
        }
    }

    pub fn config(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Self::Config {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }
}
