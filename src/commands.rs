// Status, restart, speed and toggle operations exposed to the chat layer

use crate::error::Result;
use crate::monitor::{HealthProbe, Monitor};
use crate::probe::docker::ContainerControl;
use crate::probe::speed::{SpeedReport, SpeedTester, UNAVAILABLE};
use crate::probe::system;
use std::sync::Arc;
use std::time::Duration;

const WEB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);
/// Settle time between issuing the restart and re-querying liveness
const POST_RESTART_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct StatusReport {
    pub container: String,
    pub web_reachable: bool,
    pub memory: String,
    pub disk: String,
    pub monitoring_enabled: bool,
    pub url: String,
}

impl StatusReport {
    pub fn render(&self) -> String {
        format!(
            "🖥️ *wg-easy server status*\n\n\
             🐳 *Container*: {}\n\
             🌐 *Web interface*: {}\n\
             📊 *Memory*: {}\n\
             💾 *Disk*: {}\n\
             🔔 *Monitoring*: {}\n\
             🔗 *URL*: {}",
            self.container,
            if self.web_reachable {
                "✅ reachable"
            } else {
                "❌ unreachable"
            },
            self.memory,
            self.disk,
            if self.monitoring_enabled {
                "✅ active"
            } else {
                "❌ off"
            },
            self.url,
        )
    }
}

#[derive(Debug, Clone)]
pub struct RestartReport {
    pub restarted: bool,
    pub detail: String,
}

impl RestartReport {
    pub fn render(&self) -> String {
        if self.restarted {
            format!("✅ *Container restarted!*\n\nStatus: {}", self.detail)
        } else {
            format!("❌ *Restart failed*\n\n{}", self.detail)
        }
    }
}

pub struct CommandService {
    control: Arc<dyn ContainerControl>,
    probe: Arc<dyn HealthProbe>,
    speed: SpeedTester,
    http: reqwest::Client,
    monitor: Arc<Monitor>,
    wg_easy_url: String,
}

impl CommandService {
    pub fn new(
        control: Arc<dyn ContainerControl>,
        probe: Arc<dyn HealthProbe>,
        monitor: Arc<Monitor>,
        wg_easy_url: String,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("wgsentry")
            .timeout(WEB_CHECK_TIMEOUT)
            .build()?;
        Ok(Self {
            control,
            probe,
            speed: SpeedTester::default(),
            http,
            monitor,
            wg_easy_url,
        })
    }

    /// Gather the status card. Sub-checks run concurrently and degrade
    /// individually to placeholders; the call as a whole never fails.
    pub async fn status(&self) -> StatusReport {
        let (container, web_reachable, memory, disk) = tokio::join!(
            self.container_status(),
            self.web_reachable(),
            system::memory_usage(),
            system::disk_usage(),
        );

        StatusReport {
            container,
            web_reachable,
            memory: memory.unwrap_or_else(|| UNAVAILABLE.to_string()),
            disk: disk.unwrap_or_else(|| UNAVAILABLE.to_string()),
            monitoring_enabled: self.monitor.enabled(),
            url: self.wg_easy_url.clone(),
        }
    }

    async fn container_status(&self) -> String {
        match self.control.status_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("container status check failed: {}", e);
                UNAVAILABLE.to_string()
            }
        }
    }

    async fn web_reachable(&self) -> bool {
        match self.http.get(&self.wg_easy_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Restart the container, then report the actual post-restart liveness.
    /// Liveness is re-checked, never assumed from the restart exit code.
    pub async fn restart(&self) -> RestartReport {
        tracing::warn!("restarting container on administrator request");
        if let Err(e) = self.control.restart().await {
            tracing::error!("restart failed: {}", e);
            return RestartReport {
                restarted: false,
                detail: e.to_string(),
            };
        }

        tokio::time::sleep(POST_RESTART_DELAY).await;
        let detail = match self.probe.check().await {
            Ok((true, reason)) => reason,
            Ok((false, reason)) => format!("⚠️ {}", reason),
            Err(e) => format!("⚠️ liveness re-check failed: {}", e),
        };
        RestartReport {
            restarted: true,
            detail,
        }
    }

    pub async fn speed_test(&self) -> SpeedReport {
        self.speed.run().await
    }

    pub fn toggle_monitoring(&self) -> String {
        if self.monitor.toggle_enabled() {
            "🔔 Monitoring enabled".to_string()
        } else {
            "🔕 Monitoring disabled".to_string()
        }
    }
}
