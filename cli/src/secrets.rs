//! Bot token sources
//!
//! The token is asked for interactively by default. CI and scripted runs can
//! take it from an environment variable or a file instead.

use std::path::PathBuf;

use crate::error::ProvisionError;

pub const DEFAULT_PROMPT: &str = "Please enter your Telegram Bot Token: ";

/// Something that can hand over the bot token
pub trait SecretProvider {
    /// Where the value comes from, for log lines
    fn describe(&self) -> String;

    /// The raw (untrimmed) value
    fn fetch(&self) -> Result<String, ProvisionError>;
}

/// Masked prompt on the controlling terminal
pub struct PromptSecret {
    message: String,
}

impl Default for PromptSecret {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl PromptSecret {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl SecretProvider for PromptSecret {
    fn describe(&self) -> String {
        "interactive prompt".to_string()
    }

    fn fetch(&self) -> Result<String, ProvisionError> {
        rpassword::prompt_password(&self.message)
            .map_err(|e| ProvisionError::Secret(format!("failed to read from terminal: {}", e)))
    }
}

/// Environment variable
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl SecretProvider for EnvSecret {
    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }

    fn fetch(&self) -> Result<String, ProvisionError> {
        std::env::var(&self.var)
            .map_err(|e| ProvisionError::Secret(format!("{}: {}", self.var, e)))
    }
}

/// File holding the token (trailing newline allowed)
pub struct FileSecret {
    path: PathBuf,
}

impl FileSecret {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SecretProvider for FileSecret {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&self) -> Result<String, ProvisionError> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| ProvisionError::Secret(format!("{}: {}", self.path.display(), e)))
    }
}

/// Trim the token and reject an empty one
pub fn validate_token(raw: &str) -> Result<String, ProvisionError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ProvisionError::Validation(
            "Bot Token cannot be empty".to_string(),
        ));
    }
    Ok(token.to_string())
}
