use colored::Colorize;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;

use super::ingredients::describe;
use crate::config::clamp_poll_interval;
use crate::food::types::IngredientSet;
use crate::scanner::{trigger_capture, PollerHandle, ScanPoller, ScanSource};

/// Reads the latest scan and replaces the list with what it contains.
pub async fn scan_now(source: &ScanSource, http: &Client, set: &mut IngredientSet) -> Result<String, String> {
    let artifact = source
        .read_artifact(http)
        .await
        .map_err(|e| format!("Failed to read scan: {}", e))?;

    *set = artifact.ingredients();
    Ok(format!(
        "📷 Loaded {} ingredient(s) from {}: {}",
        set.len(),
        source.to_string().cyan(),
        describe(set).bright_yellow()
    ))
}

/// Seconds from `watch start`, clamped to the allowed polling range.
pub fn parse_interval(arg: Option<&str>, default: Duration) -> Result<Duration, String> {
    match arg {
        None => Ok(default),
        Some(secs) => secs
            .parse::<u64>()
            .map(clamp_poll_interval)
            .map_err(|_| format!("'{}' is not a number of seconds", secs)),
    }
}

pub fn start_watch(
    source: ScanSource,
    interval: Duration,
    http: Client,
) -> (PollerHandle, watch::Receiver<IngredientSet>) {
    ScanPoller::new(source, interval, http).spawn()
}

pub async fn check(capture_url: Option<&str>, http: &Client) -> Result<String, String> {
    let url = capture_url.ok_or("No capture device configured. Set CAPTURE_URL or pass --capture-url.")?;
    let reply = trigger_capture(http, url)
        .await
        .map_err(|e| format!("❌ {}", e))?;
    Ok(format!("📸 Camera says: {}", reply.trim()))
}
