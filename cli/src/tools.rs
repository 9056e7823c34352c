//! Runtime tool path resolution
//!
//! For each external tool (e.g., `wrangler`) we:
//! 1. Check for an environment variable `{TOOL}_BIN` (e.g., `WRANGLER_BIN`)
//! 2. Fall back to PATH-based invocation if the envvar is not set
//!
//! This lets a pinned install (`npx`-free global binary, Nix store path, a fake
//! script in tests) be selected without touching the code.

use std::env;

/// Get the path to an external tool
///
/// Checks for an environment variable `{TOOL}_BIN` (uppercase tool name + "_BIN").
/// Falls back to the tool name itself if the envvar is not set or empty, which relies on PATH.
///
/// # Examples
///
/// ```rust,ignore
/// // With WRANGLER_BIN="/opt/node/bin/wrangler"
/// assert_eq!(get_tool_path("wrangler"), "/opt/node/bin/wrangler");
///
/// // Without WRANGLER_BIN set
/// assert_eq!(get_tool_path("wrangler"), "wrangler");
/// ```
pub fn get_tool_path(tool: &str) -> String {
    let env_var = format!("{}_BIN", tool.to_uppercase().replace('-', "_"));
    env::var(&env_var)
        .ok()
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| tool.to_string())
}

/// Common tool names
pub mod tools {
    pub const WRANGLER: &str = "wrangler";
}
