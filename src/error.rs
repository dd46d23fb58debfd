use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure reported by one of the external services (nutrition lookup or
/// recipe generation).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{service} rejected the configured credentials: {detail}")]
    Unauthorized { service: &'static str, detail: String },
    #[error("{service} returned status {status}: {detail}")]
    Status {
        service: &'static str,
        status: u16,
        detail: String,
    },
    #[error("Failed to reach {service}: {detail}")]
    Transport { service: &'static str, detail: String },
    #[error("Unexpected response from {service}: {detail}")]
    Malformed { service: &'static str, detail: String },
}

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Authentication with {service} failed: {detail}")]
    Authentication { service: &'static str, detail: String },
    #[error("{service} request failed: {detail}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        detail: String,
    },
    #[error("Invalid recipe format received: {0}")]
    Parse(String),
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl RecipeError {
    /// Machine-readable kind sent to callers. Upstream credential rejections
    /// are reported as configuration problems.
    pub fn kind(&self) -> &'static str {
        match self {
            RecipeError::Validation(_) => "validation_error",
            RecipeError::Configuration(_) | RecipeError::Authentication { .. } => {
                "configuration_error"
            }
            RecipeError::Upstream { .. } => "upstream_error",
            RecipeError::Parse(_) => "parse_error",
            RecipeError::Timeout(_) => "timeout_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RecipeError::Validation(_) => StatusCode::BAD_REQUEST,
            RecipeError::Configuration(_) | RecipeError::Authentication { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RecipeError::Upstream { status, .. } => status
                .filter(|s| *s >= 500)
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            RecipeError::Parse(_) => StatusCode::BAD_GATEWAY,
            RecipeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<ServiceError> for RecipeError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized { service, detail } => {
                RecipeError::Authentication { service, detail }
            }
            ServiceError::Status {
                service,
                status,
                detail,
            } => RecipeError::Upstream {
                service,
                status: Some(status),
                detail,
            },
            ServiceError::Transport { service, detail }
            | ServiceError::Malformed { service, detail } => RecipeError::Upstream {
                service,
                status: None,
                detail,
            },
        }
    }
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed ({}): {}", self.kind(), self);
        } else {
            log::warn!("Request rejected ({}): {}", self.kind(), self);
        }

        error_response(status, self.kind(), &self.to_string())
    }
}

/// The error envelope every failed API call answers with.
pub fn error_response(status: StatusCode, kind: &str, detail: &str) -> Response {
    let body = json!({
        "success": false,
        "error": {
            "kind": kind,
            "detail": detail,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status, Json(body)).into_response()
}
