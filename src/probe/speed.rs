// Network speed measurement via an external speedtest utility

use serde::Deserialize;
use std::time::Duration;
use tokio::process::Command;

const SPEEDTEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Placeholder for any figure the tool did not produce
pub const UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedReport {
    pub ping_ms: String,
    pub download_mbps: String,
    pub upload_mbps: String,
}

impl SpeedReport {
    pub fn unavailable() -> Self {
        Self {
            ping_ms: UNAVAILABLE.to_string(),
            download_mbps: UNAVAILABLE.to_string(),
            upload_mbps: UNAVAILABLE.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "🚀 *Speed test*\n\n\
             🏓 *Ping*: {} ms\n\
             ⬇️ *Download*: {} Mbit/s\n\
             ⬆️ *Upload*: {} Mbit/s",
            self.ping_ms, self.download_mbps, self.upload_mbps
        )
    }
}

// speedtest-cli --json; download/upload are bits per second
#[derive(Debug, Deserialize)]
struct SpeedtestJson {
    ping: Option<f64>,
    download: Option<f64>,
    upload: Option<f64>,
}

/// Runs the measurement tool on the command path, never on the monitor loop.
/// The tool is an opaque dependency; any compatible binary can be substituted.
#[derive(Debug, Clone)]
pub struct SpeedTester {
    program: String,
}

impl Default for SpeedTester {
    fn default() -> Self {
        Self {
            program: "speedtest-cli".to_string(),
        }
    }
}

impl SpeedTester {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Always produces a report; fields the tool could not supply degrade
    /// to the "N/A" placeholder.
    pub async fn run(&self) -> SpeedReport {
        let result = tokio::time::timeout(
            SPEEDTEST_TIMEOUT,
            Command::new(&self.program).arg("--json").output(),
        )
        .await;

        let stdout = match result {
            Ok(Ok(output)) => String::from_utf8_lossy(&output.stdout).into_owned(),
            Ok(Err(e)) => {
                tracing::error!("speed test could not run: {}", e);
                return SpeedReport::unavailable();
            }
            Err(_) => {
                tracing::error!("speed test timed out after {:?}", SPEEDTEST_TIMEOUT);
                return SpeedReport::unavailable();
            }
        };

        parse_report(&stdout)
    }
}

/// Structured output first, falling back to the human-readable format
pub(crate) fn parse_report(stdout: &str) -> SpeedReport {
    parse_json(stdout).unwrap_or_else(|| parse_text(stdout))
}

fn parse_json(stdout: &str) -> Option<SpeedReport> {
    let parsed: SpeedtestJson = serde_json::from_str(stdout.trim()).ok()?;
    Some(SpeedReport {
        ping_ms: format_figure(parsed.ping),
        download_mbps: format_figure(parsed.download.map(bits_to_mbps)),
        upload_mbps: format_figure(parsed.upload.map(bits_to_mbps)),
    })
}

// "Ping: 12.3 ms" / "Download: 94.2 Mbit/s" / "Upload: 11.0 Mbit/s"
fn parse_text(stdout: &str) -> SpeedReport {
    let mut report = SpeedReport::unavailable();
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Ping:") {
            report.ping_ms = format_figure(leading_number(rest));
        } else if let Some(rest) = line.strip_prefix("Download:") {
            report.download_mbps = format_figure(leading_number(rest));
        } else if let Some(rest) = line.strip_prefix("Upload:") {
            report.upload_mbps = format_figure(leading_number(rest));
        }
    }
    report
}

fn leading_number(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

fn bits_to_mbps(bits_per_sec: f64) -> f64 {
    bits_per_sec / 1_000_000.0
}

fn format_figure(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => UNAVAILABLE.to_string(),
    }
}
