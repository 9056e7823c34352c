//! Provision service - runs the one-shot bot deployment
//!
//! Seven steps, strictly in order:
//! 1. `wrangler d1 create` and scrape the database ID
//! 2. Point wrangler.toml's D1 binding at it
//! 3. Apply schema.sql remotely
//! 4. `wrangler deploy` and scrape the worker URL
//! 5. Read the bot token and store it as a worker secret
//! 6. Register the Telegram webhook (failure falls back to a manual URL)
//! 7. Print the Group Privacy reminder
//!
//! Any failure in steps 1-5 stops the run. Re-running is not idempotent:
//! step 1 would create a second database. Use `bind-database` and
//! `set-webhook` to finish a partially completed run instead.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::{rewrite_database_binding, ProvisionSettings};
use crate::domain::{
    redact_token, webhook_url, DatabaseBinding, DatabaseId, ProvisionStep, WorkerUrl,
};
use crate::error::ProvisionError;
use crate::infrastructure::{CloudTool, WebhookApi};
use crate::secrets::{validate_token, SecretProvider};
use crate::ui;

pub const GROUP_PRIVACY_REMINDER: &str = "Please make sure to disable Group Privacy mode for your bot: /mybots -> select bot -> Bot Settings -> Group Privacy -> Turn off";

/// How webhook registration ended
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// The API accepted the webhook; holds its response body
    Registered(Value),
    /// The request failed; the operator has to open `url` themselves
    ManualFallback { url: String, reason: String },
}

impl WebhookOutcome {
    /// URL the operator still has to open, if registration failed
    pub fn manual_url(&self) -> Option<&str> {
        match self {
            Self::Registered(_) => None,
            Self::ManualFallback { url, .. } => Some(url),
        }
    }
}

/// Result of a complete provisioning run
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub database_id: DatabaseId,
    pub worker_url: WorkerUrl,
    pub webhook: WebhookOutcome,
    /// Steps that finished, in order
    pub completed: Vec<ProvisionStep>,
}

/// Service for provisioning the bot
pub struct ProvisionService<C, W> {
    settings: ProvisionSettings,
    cloud: C,
    webhook: W,
}

impl<C: CloudTool, W: WebhookApi> ProvisionService<C, W> {
    pub fn new(settings: ProvisionSettings, cloud: C, webhook: W) -> Self {
        Self {
            settings,
            cloud,
            webhook,
        }
    }

    pub fn settings(&self) -> &ProvisionSettings {
        &self.settings
    }

    /// Run all seven steps
    pub async fn run(&self, secrets: &dyn SecretProvider) -> Result<ProvisionReport, ProvisionError> {
        let mut completed = Vec::with_capacity(ProvisionStep::ALL.len());

        begin(ProvisionStep::CreateDatabase);
        let database_id = self
            .cloud
            .create_database(&self.settings.database_name)
            .await
            .map_err(|e| fail(ProvisionStep::CreateDatabase, e))?;
        ui::print_success(&format!("D1 database created: {}", database_id));
        completed.push(ProvisionStep::CreateDatabase);

        begin(ProvisionStep::UpdateConfig);
        self.bind_database(&database_id)
            .map_err(|e| fail(ProvisionStep::UpdateConfig, e))?;
        completed.push(ProvisionStep::UpdateConfig);

        begin(ProvisionStep::ApplySchema);
        self.cloud
            .apply_schema(&self.settings.database_name, &self.settings.schema_path)
            .await
            .map_err(|e| fail(ProvisionStep::ApplySchema, e))?;
        ui::print_success("Database tables created successfully");
        completed.push(ProvisionStep::ApplySchema);

        begin(ProvisionStep::Deploy);
        let worker_url = self
            .cloud
            .deploy()
            .await
            .map_err(|e| fail(ProvisionStep::Deploy, e))?;
        ui::print_success(&format!("Worker URL: {}", worker_url));
        completed.push(ProvisionStep::Deploy);

        begin(ProvisionStep::StoreSecret);
        let token = self
            .store_token(secrets)
            .await
            .map_err(|e| fail(ProvisionStep::StoreSecret, e))?;
        completed.push(ProvisionStep::StoreSecret);

        begin(ProvisionStep::RegisterWebhook);
        let webhook = self.register_webhook(&token, &worker_url).await;
        completed.push(ProvisionStep::RegisterWebhook);

        begin(ProvisionStep::Reminder);
        remind();
        completed.push(ProvisionStep::Reminder);

        Ok(ProvisionReport {
            database_id,
            worker_url,
            webhook,
            completed,
        })
    }

    /// Rewrite wrangler.toml so its only D1 binding points at `database_id`
    pub fn bind_database(&self, database_id: &DatabaseId) -> Result<DatabaseBinding, ProvisionError> {
        let binding = DatabaseBinding::new(
            self.settings.binding.as_str(),
            self.settings.database_name.as_str(),
            database_id,
        );
        let path = self.settings.config_file();
        rewrite_database_binding(&path, &binding)?;
        ui::print_success(&format!("{} configuration updated successfully", path.display()));
        Ok(binding)
    }

    /// Read, validate and store the bot token; returns the trimmed token
    async fn store_token(&self, secrets: &dyn SecretProvider) -> Result<String, ProvisionError> {
        info!("Reading bot token from {}", secrets.describe());
        let token = validate_token(&secrets.fetch()?)?;

        self.cloud
            .put_secret(&self.settings.secret_name, &token)
            .await?;
        ui::print_success("Bot Token set successfully");
        Ok(token)
    }

    /// Register the webhook against the configured API base
    pub async fn register_webhook(&self, token: &str, worker_url: &WorkerUrl) -> WebhookOutcome {
        register_webhook(&self.webhook, &self.settings.api_base, token, worker_url).await
    }
}

/// Register the webhook; never fails, falls back to printing the URL
pub async fn register_webhook(
    api: &dyn WebhookApi,
    api_base: &str,
    token: &str,
    worker_url: &WorkerUrl,
) -> WebhookOutcome {
    let url = webhook_url(api_base, token, worker_url);
    info!("Setting up webhook: {}", redact_token(&url, token));

    match api.set_webhook(&url).await {
        Ok(body) => {
            ui::print_success(&format!("Webhook setup result: {}", body));
            WebhookOutcome::Registered(body)
        }
        Err(e) => {
            warn!("Webhook setup failed: {}", e);
            ui::print_error(&format!("Webhook setup failed: {}", e));
            ui::print_warning(&format!("please set webhook manually: {}", url));
            WebhookOutcome::ManualFallback {
                url,
                reason: e.to_string(),
            }
        }
    }
}

fn begin(step: ProvisionStep) {
    ui::print_step(
        step.number(),
        ProvisionStep::ALL.len(),
        step.emoji(),
        step.name(),
    );
}

fn fail(step: ProvisionStep, err: ProvisionError) -> ProvisionError {
    error!("Step {} ({}) failed: {}", step.number(), step.name(), err);
    err
}

/// Print the Group Privacy reminder
pub fn remind() {
    ui::print_info(GROUP_PRIVACY_REMINDER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_API_BASE;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const TOKEN: &str = "123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw";
    const WORKER: &str = "https://telegram-summary-bot.someone.workers.dev";

    type CallLog = Arc<Mutex<Vec<String>>>;

    #[derive(Clone, Copy, PartialEq)]
    enum Failure {
        None,
        CreateExtraction,
        DeployExtraction,
        SchemaTool,
    }

    struct FakeCloud {
        calls: CallLog,
        failure: Failure,
    }

    #[async_trait]
    impl CloudTool for FakeCloud {
        async fn create_database(&self, name: &str) -> Result<DatabaseId, ProvisionError> {
            self.calls.lock().unwrap().push(format!("create_database {}", name));
            if self.failure == Failure::CreateExtraction {
                return Err(ProvisionError::extraction("database ID", "database_id"));
            }
            Ok(DatabaseId::new("abc-123"))
        }

        async fn apply_schema(&self, database: &str, schema_path: &str) -> Result<(), ProvisionError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("apply_schema {} {}", database, schema_path));
            if self.failure == Failure::SchemaTool {
                return Err(ProvisionError::ExternalTool {
                    command: "wrangler d1 execute".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "no such file".to_string(),
                });
            }
            Ok(())
        }

        async fn deploy(&self) -> Result<WorkerUrl, ProvisionError> {
            self.calls.lock().unwrap().push("deploy".to_string());
            if self.failure == Failure::DeployExtraction {
                return Err(ProvisionError::extraction("Worker URL", "workers.dev"));
            }
            Ok(WorkerUrl::new(WORKER))
        }

        async fn put_secret(&self, name: &str, value: &str) -> Result<(), ProvisionError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("put_secret {} {}", name, value));
            Ok(())
        }
    }

    struct FakeWebhook {
        calls: CallLog,
        fail: bool,
    }

    #[async_trait]
    impl WebhookApi for FakeWebhook {
        async fn set_webhook(&self, webhook_url: &str) -> Result<Value, ProvisionError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("set_webhook {}", webhook_url));
            if self.fail {
                return Err(ProvisionError::Network("500 Internal Server Error".to_string()));
            }
            Ok(serde_json::json!({"ok": true, "result": true}))
        }
    }

    struct FixedSecret(&'static str);

    impl SecretProvider for FixedSecret {
        fn describe(&self) -> String {
            "test value".to_string()
        }

        fn fetch(&self) -> Result<String, ProvisionError> {
            Ok(self.0.to_string())
        }
    }

    const BASE_CONFIG: &str = r#"name = "telegram-summary-bot"
main = "src/index.ts"

[[d1_databases]]
binding = "DB"
database_name = "telegram-summary-bot"
database_id = "previous-id"
"#;

    struct Harness {
        dir: TempDir,
        calls: CallLog,
        service: ProvisionService<FakeCloud, FakeWebhook>,
    }

    impl Harness {
        fn new(failure: Failure, webhook_fails: bool) -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("wrangler.toml"), BASE_CONFIG).unwrap();
            let calls = CallLog::default();
            let service = ProvisionService::new(
                ProvisionSettings::in_dir(dir.path()),
                FakeCloud {
                    calls: calls.clone(),
                    failure,
                },
                FakeWebhook {
                    calls: calls.clone(),
                    fail: webhook_fails,
                },
            );
            Self {
                dir,
                calls,
                service,
            }
        }

        fn config(&self) -> String {
            std::fs::read_to_string(self.dir.path().join("wrangler.toml")).unwrap()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn called(&self, prefix: &str) -> bool {
            self.calls().iter().any(|c| c.starts_with(prefix))
        }
    }

    #[tokio::test]
    async fn test_full_run_in_order() {
        let harness = Harness::new(Failure::None, false);

        let report = harness.service.run(&FixedSecret(TOKEN)).await.unwrap();

        assert_eq!(report.database_id.as_str(), "abc-123");
        assert_eq!(report.worker_url.as_str(), WORKER);
        assert_eq!(report.completed, ProvisionStep::ALL.to_vec());
        assert!(matches!(report.webhook, WebhookOutcome::Registered(_)));
        assert_eq!(
            harness.calls(),
            vec![
                "create_database telegram-summary-bot".to_string(),
                "apply_schema telegram-summary-bot ./schema.sql".to_string(),
                "deploy".to_string(),
                format!("put_secret TELEGRAM_BOT_TOKEN {}", TOKEN),
                format!(
                    "set_webhook https://api.telegram.org/bot{}/setWebhook?url={}",
                    TOKEN, WORKER
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_full_run_rewrites_binding() {
        let harness = Harness::new(Failure::None, false);

        harness.service.run(&FixedSecret(TOKEN)).await.unwrap();

        let doc: toml::Table = toml::from_str(&harness.config()).unwrap();
        assert_eq!(
            crate::config::wrangler::database_bindings(&doc),
            vec![DatabaseBinding {
                binding: "DB".to_string(),
                database_name: "telegram-summary-bot".to_string(),
                database_id: "abc-123".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_database_extraction_failure_leaves_config() {
        let harness = Harness::new(Failure::CreateExtraction, false);

        let err = harness.service.run(&FixedSecret(TOKEN)).await.unwrap_err();

        assert!(matches!(err, ProvisionError::Extraction { .. }));
        assert_eq!(harness.config(), BASE_CONFIG);
        assert_eq!(harness.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_schema_failure_stops_before_deploy() {
        let harness = Harness::new(Failure::SchemaTool, false);

        let err = harness.service.run(&FixedSecret(TOKEN)).await.unwrap_err();

        assert!(matches!(err, ProvisionError::ExternalTool { .. }));
        assert!(!harness.called("deploy"));
    }

    #[tokio::test]
    async fn test_deploy_extraction_failure_skips_webhook() {
        let harness = Harness::new(Failure::DeployExtraction, false);

        let err = harness.service.run(&FixedSecret(TOKEN)).await.unwrap_err();

        assert!(matches!(err, ProvisionError::Extraction { .. }));
        assert!(!harness.called("put_secret"));
        assert!(!harness.called("set_webhook"));
    }

    #[tokio::test]
    async fn test_blank_token_fails_before_storing_secret() {
        let harness = Harness::new(Failure::None, false);

        let err = harness.service.run(&FixedSecret("   \n")).await.unwrap_err();

        assert!(matches!(err, ProvisionError::Validation(_)));
        assert!(harness.called("deploy"));
        assert!(!harness.called("put_secret"));
        assert!(!harness.called("set_webhook"));
    }

    #[tokio::test]
    async fn test_token_is_trimmed_before_use() {
        let harness = Harness::new(Failure::None, false);

        harness
            .service
            .run(&FixedSecret("  123:abc\n"))
            .await
            .unwrap();

        assert!(harness
            .calls()
            .contains(&"put_secret TELEGRAM_BOT_TOKEN 123:abc".to_string()));
    }

    #[tokio::test]
    async fn test_webhook_failure_falls_back_and_still_reminds() {
        let harness = Harness::new(Failure::None, true);

        let report = harness.service.run(&FixedSecret(TOKEN)).await.unwrap();

        match &report.webhook {
            WebhookOutcome::ManualFallback { url, reason } => {
                assert_eq!(
                    url,
                    &format!("https://api.telegram.org/bot{}/setWebhook?url={}", TOKEN, WORKER)
                );
                assert!(reason.contains("500"));
            }
            other => panic!("expected manual fallback, got {other:?}"),
        }
        assert_eq!(report.completed.last(), Some(&ProvisionStep::Reminder));
    }

    #[tokio::test]
    async fn test_register_webhook_uses_api_base() {
        let mut harness = Harness::new(Failure::None, false);
        harness.service.settings.api_base = "http://127.0.0.1:8081/".to_string();

        let outcome = harness
            .service
            .register_webhook("t", &WorkerUrl::new(WORKER))
            .await;

        assert!(matches!(outcome, WebhookOutcome::Registered(_)));
        assert_eq!(
            harness.calls(),
            vec![format!("set_webhook http://127.0.0.1:8081/bott/setWebhook?url={}", WORKER)]
        );
    }

    #[tokio::test]
    async fn test_register_webhook_needs_only_webhook_api() {
        let calls = CallLog::default();
        let api = FakeWebhook {
            calls: calls.clone(),
            fail: true,
        };

        let outcome = register_webhook(&api, DEFAULT_API_BASE, TOKEN, &WorkerUrl::new(WORKER)).await;

        let expected = format!("https://api.telegram.org/bot{}/setWebhook?url={}", TOKEN, WORKER);
        assert_eq!(outcome.manual_url(), Some(expected.as_str()));
        assert_eq!(*calls.lock().unwrap(), vec![format!("set_webhook {}", expected)]);
    }

    #[test]
    fn test_bind_database_standalone() {
        let harness = Harness::new(Failure::None, false);

        let binding = harness
            .service
            .bind_database(&DatabaseId::new("manual-id"))
            .unwrap();

        assert_eq!(binding.database_id, "manual-id");
        assert!(harness.config().contains("manual-id"));
        assert!(!harness.config().contains("previous-id"));
        assert!(harness.calls().is_empty());
    }
}
