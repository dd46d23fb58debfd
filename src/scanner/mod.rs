pub mod poller;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::food::extractor::extract;
use crate::food::types::IngredientSet;

pub use poller::{PollerHandle, ScanPoller};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No scan has been written to {0} yet")]
    NotFound(String),
    #[error("Failed to read scan output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch scan output: {0}")]
    Http(String),
    #[error("Scan output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Upper bound on one read from, or trigger of, the capture device.
pub const SCAN_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the capture device. A device that accepts the connection
/// and never answers fails after `timeout` instead of stalling the caller.
pub fn scan_client(timeout: Duration) -> Result<Client, ScanError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(timeout)
        .build()
        .map_err(|e| ScanError::Http(format!("Failed to build scan client: {}", e)))
}

/// The JSON document the fridge camera writes after each capture. Fields other
/// than `raw_output` are kept so the artifact can be served back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanArtifact {
    #[serde(default)]
    pub raw_output: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ScanArtifact {
    pub fn ingredients(&self) -> IngredientSet {
        extract(&self.raw_output)
    }
}

/// Where the latest scan artifact can be read from.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanSource {
    File(PathBuf),
    Url(String),
}

impl std::fmt::Display for ScanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanSource::File(path) => write!(f, "{}", path.display()),
            ScanSource::Url(url) => write!(f, "{}", url),
        }
    }
}

impl ScanSource {
    /// Raw bytes of the artifact, exactly as stored.
    pub async fn read_raw(&self, client: &Client) -> Result<Vec<u8>, ScanError> {
        match self {
            ScanSource::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(ScanError::NotFound(path.display().to_string()))
                }
                Err(e) => Err(ScanError::Io(e)),
            },
            ScanSource::Url(url) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| ScanError::Http(e.to_string()))?;
                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScanError::NotFound(url.clone()));
                }
                if !response.status().is_success() {
                    return Err(ScanError::Http(format!(
                        "{} returned status {}",
                        url,
                        response.status()
                    )));
                }
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| ScanError::Http(e.to_string()))?;
                Ok(bytes.to_vec())
            }
        }
    }

    pub async fn read_artifact(&self, client: &Client) -> Result<ScanArtifact, ScanError> {
        let bytes = self.read_raw(client).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Asks the capture device to take a new picture. Returns whatever status text
/// the device answers with.
pub async fn trigger_capture(client: &Client, capture_url: &str) -> Result<String, ScanError> {
    let url = format!("{}/run", capture_url.trim_end_matches('/'));
    log::info!("Triggering capture at {}", url);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ScanError::Http(format!("Failed to check fridge: {}", e)))?;

    if !response.status().is_success() {
        return Err(ScanError::Http(format!(
            "Failed to check fridge: status {}",
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| ScanError::Http(e.to_string()))
}
