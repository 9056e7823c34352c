//! Wrangler CLI operations
//!
//! Every Cloudflare resource this tool touches goes through the `wrangler`
//! binary. Output scraping lives in `domain::extract`; this adapter only runs
//! the commands and maps their exit status.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::{parse_database_id, parse_worker_url, DatabaseId, WorkerUrl};
use crate::error::ProvisionError;
use crate::tools::{get_tool_path, tools};
use crate::ui;

/// Cloud resource operations needed by the provisioning flow
#[async_trait]
pub trait CloudTool: Send + Sync {
    /// Create a D1 database and return its ID
    async fn create_database(&self, name: &str) -> Result<DatabaseId, ProvisionError>;

    /// Run a schema file against the remote database
    async fn apply_schema(&self, database: &str, schema_path: &str) -> Result<(), ProvisionError>;

    /// Deploy the worker and return its public URL
    async fn deploy(&self) -> Result<WorkerUrl, ProvisionError>;

    /// Store `value` as a worker secret
    async fn put_secret(&self, name: &str, value: &str) -> Result<(), ProvisionError>;
}

/// Client for the wrangler CLI
pub struct WranglerClient {
    program: String,
    /// Arguments placed before the subcommand (e.g. `wrangler` for `npx wrangler`)
    leading_args: Vec<String>,
    working_dir: PathBuf,
}

impl WranglerClient {
    /// Wrangler from `WRANGLER_BIN` or PATH, run in `working_dir`
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: get_tool_path(tools::WRANGLER),
            leading_args: Vec::new(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Run wrangler through the project's node_modules via `npx`
    pub fn via_npx(working_dir: impl AsRef<Path>) -> Self {
        Self::new(working_dir).with_command("npx", [tools::WRANGLER])
    }

    /// Replace the program and its leading arguments
    pub fn with_command<I, S>(mut self, program: impl Into<String>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = program.into();
        self.leading_args = leading_args.into_iter().map(Into::into).collect();
        self
    }

    fn display(&self, args: &[&str]) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.leading_args.iter().map(String::as_str));
        parts.extend(args.iter().copied());
        parts.join(" ")
    }

    /// Run a wrangler subcommand and return its stdout
    ///
    /// `stdin` is written to the child and then closed; it never appears in
    /// the argument list or in logs.
    async fn run(&self, args: &[&str], stdin: Option<&str>) -> Result<String, ProvisionError> {
        let command = self.display(args);
        debug!("Running: {} (in {})", command, self.working_dir.display());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| ProvisionError::ExternalTool {
            command: command.clone(),
            status: "failed to start".to_string(),
            stderr: e.to_string(),
        })?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes())
                .await
                .map_err(|e| ProvisionError::ExternalTool {
                    command: command.clone(),
                    status: "stdin write failed".to_string(),
                    stderr: e.to_string(),
                })?;
            // Dropping the handle closes the pipe so wrangler sees EOF
            drop(pipe);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProvisionError::ExternalTool {
                command: command.clone(),
                status: "wait failed".to_string(),
                stderr: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ProvisionError::ExternalTool {
                command,
                status: output.status.to_string(),
                stderr: if stderr.is_empty() {
                    stdout.trim().to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(stdout)
    }

    async fn run_with_spinner(&self, message: &str, args: &[&str]) -> Result<String, ProvisionError> {
        let spinner = ui::spinner(message);
        let result = self.run(args, None).await;
        spinner.finish_and_clear();
        result
    }
}

#[async_trait]
impl CloudTool for WranglerClient {
    async fn create_database(&self, name: &str) -> Result<DatabaseId, ProvisionError> {
        info!("Creating D1 database: {}", name);
        let output = self
            .run_with_spinner("Creating D1 database...", &["d1", "create", name])
            .await?;
        ui::print_tool_output(&output);

        parse_database_id(&output)
    }

    async fn apply_schema(&self, database: &str, schema_path: &str) -> Result<(), ProvisionError> {
        info!("Applying {} to {}", schema_path, database);
        let file_arg = format!("--file={}", schema_path);
        self.run_with_spinner(
            "Creating database tables...",
            &["d1", "execute", database, file_arg.as_str(), "--remote"],
        )
        .await?;
        Ok(())
    }

    async fn deploy(&self) -> Result<WorkerUrl, ProvisionError> {
        info!("Deploying worker from {}", self.working_dir.display());
        let output = self
            .run_with_spinner("Deploying project...", &["deploy"])
            .await?;
        ui::print_tool_output(&output);

        parse_worker_url(&output)
    }

    async fn put_secret(&self, name: &str, value: &str) -> Result<(), ProvisionError> {
        info!("Storing worker secret: {}", name);
        self.run(&["secret", "put", name], Some(value)).await?;
        Ok(())
    }
}
