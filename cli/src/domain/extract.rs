//! Scraping identifiers out of wrangler's human-readable output
//!
//! Wrangler has no stable machine-readable output for `d1 create` and `deploy`,
//! so each value is pulled out by a single pattern. Keeping one function per
//! value lets the patterns be tested against captured output.

use regex::Regex;
use std::sync::LazyLock;

use super::resource::{DatabaseId, WorkerUrl};
use crate::error::ProvisionError;

/// Matches both the TOML snippet (`database_id = "..."`) and the JSON
/// snippet (`"database_id": "..."`) printed by different wrangler releases.
/// The word boundary keeps `preview_database_id` from matching.
pub const DATABASE_ID_PATTERN: &str = r#""?\bdatabase_id"?\s*[=:]\s*"([a-zA-Z0-9-]+)""#;

pub const WORKER_URL_PATTERN: &str = r"https://[^\s]+\.workers\.dev";

static DATABASE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATABASE_ID_PATTERN).expect("database id pattern is valid"));

static WORKER_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WORKER_URL_PATTERN).expect("worker url pattern is valid"));

/// Extract the database ID from `wrangler d1 create` output
pub fn parse_database_id(output: &str) -> Result<DatabaseId, ProvisionError> {
    DATABASE_ID_RE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| DatabaseId::new(m.as_str()))
        .ok_or_else(|| ProvisionError::extraction("database ID", DATABASE_ID_PATTERN))
}

/// Extract the `*.workers.dev` URL from `wrangler deploy` output
pub fn parse_worker_url(output: &str) -> Result<WorkerUrl, ProvisionError> {
    WORKER_URL_RE
        .find(output)
        .map(|m| WorkerUrl::new(m.as_str()))
        .ok_or_else(|| ProvisionError::extraction("Worker URL", WORKER_URL_PATTERN))
}
