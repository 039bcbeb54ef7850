// Host memory and disk figures via coreutils

use std::time::Duration;
use tokio::process::Command;

const STAT_TIMEOUT: Duration = Duration::from_secs(2);

/// "used/total" memory figure from `free -h`, or None if the command
/// failed or printed something unexpected
pub async fn memory_usage() -> Option<String> {
    let stdout = run("free", &["-h"]).await?;
    parse_free_output(&stdout)
}

/// "used/total" figure for the root filesystem from `df -h /`
pub async fn disk_usage() -> Option<String> {
    let stdout = run("df", &["-h", "/"]).await?;
    parse_df_output(&stdout)
}

async fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = tokio::time::timeout(STAT_TIMEOUT, Command::new(program).args(args).output())
        .await
        .ok()?
        .ok()?;
    if !output.status.success() {
        tracing::debug!("{} exited with {}", program, output.status);
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

// free -h: header line, then "Mem: <total> <used> <free> ..."
pub(crate) fn parse_free_output(stdout: &str) -> Option<String> {
    let fields: Vec<&str> = stdout.lines().nth(1)?.split_whitespace().collect();
    let total = fields.get(1)?;
    let used = fields.get(2)?;
    Some(format!("{}/{}", used, total))
}

// df -h /: header line, then "<fs> <size> <used> <avail> <use%> <mount>"
pub(crate) fn parse_df_output(stdout: &str) -> Option<String> {
    let fields: Vec<&str> = stdout.lines().nth(1)?.split_whitespace().collect();
    let total = fields.get(1)?;
    let used = fields.get(2)?;
    Some(format!("{}/{}", used, total))
}
