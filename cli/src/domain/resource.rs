//! Provisioned resource types
//!
//! Values captured from the external tool and handed from one step to the next.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a managed D1 database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseId(String);

impl DatabaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public URL of the deployed worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerUrl(String);

impl WorkerUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `[[d1_databases]]` entry in wrangler.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseBinding {
    /// Name the worker code uses (e.g., `env.DB`)
    pub binding: String,
    pub database_name: String,
    pub database_id: String,
}

impl DatabaseBinding {
    pub fn new(
        binding: impl Into<String>,
        database_name: impl Into<String>,
        database_id: &DatabaseId,
    ) -> Self {
        Self {
            binding: binding.into(),
            database_name: database_name.into(),
            database_id: database_id.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_from_database_id() {
        let id = DatabaseId::new("abc-123");
        let binding = DatabaseBinding::new("DB", "telegram-summary-bot", &id);
        assert_eq!(binding.binding, "DB");
        assert_eq!(binding.database_name, "telegram-summary-bot");
        assert_eq!(binding.database_id, "abc-123");
    }

    #[test]
    fn test_display_is_raw_value() {
        assert_eq!(DatabaseId::new("abc-123").to_string(), "abc-123");
        assert_eq!(
            WorkerUrl::new("https://bot.acct.workers.dev").to_string(),
            "https://bot.acct.workers.dev"
        );
    }
}
