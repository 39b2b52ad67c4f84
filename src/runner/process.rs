//! External tool execution
//!
//! The workflow never spawns processes directly; it goes through
//! [`ToolRunner`] so tests can substitute a recording fake.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::utils::binary_resolver;

/// Captured result of one tool run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    /// Process exited with status 0
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Non-zero exit or anything written to stderr
    pub fn failed(&self) -> bool {
        !self.success || !self.stderr.trim().is_empty()
    }
}

/// Runs an external tool and captures its output
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutput>;
}

/// Spawns real processes, resolving the tool through the binary resolver
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutput> {
        let path = binary_resolver::find_binary(tool)?;
        debug!("Running {} {:?}", path.display(), args);

        let child = Command::new(&path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to execute {}", tool))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.with_context(|| format!("Failed to wait for {}", tool))?,
            Err(_) => anyhow::bail!(
                "{} did not finish within {}s",
                tool,
                self.timeout.as_secs()
            ),
        };

        Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
