// Docker container probing and control

use crate::error::{Result, SentryError};
use crate::monitor::HealthProbe;
use async_trait::async_trait;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const RESTART_TIMEOUT: Duration = Duration::from_secs(30);

/// Container lifecycle operations used by the command layer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerControl: Send + Sync {
    /// Raw status line as reported by the container runtime
    async fn status_line(&self) -> Result<String>;

    /// Restart the container; Err carries the runtime's error output.
    /// Not retried automatically.
    async fn restart(&self) -> Result<()>;
}

/// Probes and controls a single named container via the docker CLI
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    container: String,
}

impl DockerRuntime {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    async fn docker(args: &[&str], timeout: Duration) -> Result<Output> {
        let invocation = format!("docker {}", args.join(" "));
        let output = tokio::time::timeout(timeout, Command::new("docker").args(args).output())
            .await
            .map_err(|_| SentryError::Probe(format!("{} timed out", invocation)))?
            .map_err(|e| SentryError::Probe(format!("{} could not run: {}", invocation, e)))?;
        Ok(output)
    }

    async fn raw_status(&self) -> Result<String> {
        let filter = format!("name={}", self.container);
        let output = Self::docker(
            &["ps", "--filter", &filter, "--format", "{{.Status}}"],
            PROBE_TIMEOUT,
        )
        .await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl HealthProbe for DockerRuntime {
    async fn check(&self) -> Result<(bool, String)> {
        let status = self.raw_status().await?;
        if status.is_empty() || !status.to_lowercase().contains("up") {
            return Ok((false, "container is not running".to_string()));
        }

        // The container can report "Up" while its main process is wedged
        let exec = Self::docker(&["exec", &self.container, "ps", "aux"], PROBE_TIMEOUT).await?;
        if !exec.status.success() {
            return Ok((false, "container is not responding".to_string()));
        }

        Ok((true, "container is up and responding".to_string()))
    }
}

#[async_trait]
impl ContainerControl for DockerRuntime {
    async fn status_line(&self) -> Result<String> {
        let status = self.raw_status().await?;
        if status.is_empty() {
            Ok("not running".to_string())
        } else {
            Ok(status)
        }
    }

    async fn restart(&self) -> Result<()> {
        let output = Self::docker(&["restart", &self.container], RESTART_TIMEOUT)
            .await
            .map_err(|e| SentryError::ContainerControl {
                target: self.container.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("docker restart exited with {}", output.status)
            } else {
                stderr
            };
            return Err(SentryError::ContainerControl {
                target: self.container.clone(),
                message,
            }
            .into());
        }

        Ok(())
    }
}
