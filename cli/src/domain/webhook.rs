//! Telegram webhook URL construction

use super::resource::WorkerUrl;

/// Build the `setWebhook` URL the bot API expects
///
/// `<api_base>/bot<token>/setWebhook?url=<worker_url>`. The same string is
/// handed to the operator when registration has to be finished by hand, so it
/// must stay directly openable in a browser.
pub fn webhook_url(api_base: &str, token: &str, worker_url: &WorkerUrl) -> String {
    format!(
        "{}/bot{}/setWebhook?url={}",
        api_base.trim_end_matches('/'),
        token,
        worker_url.as_str()
    )
}

/// Mask every occurrence of `token` in `text` for logging
pub fn redact_token(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    let preview = if token.chars().count() > 10 {
        let head: String = token.chars().take(5).collect();
        let tail: String = token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    };
    text.replace(token, &preview)
}
