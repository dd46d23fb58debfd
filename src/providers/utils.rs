use reqwest::{Response, StatusCode};

use crate::error::ServiceError;

const MAX_DETAIL_LEN: usize = 300;

/// Passes a successful response through and turns everything else into a
/// [`ServiceError`]. 401 and 403 mean the configured credentials were refused.
pub async fn check_status(service: &'static str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(service, status, &body))
}

pub fn status_error(service: &'static str, status: StatusCode, body: &str) -> ServiceError {
    let detail = truncate(body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized {
            service,
            detail: if detail.is_empty() {
                status.to_string()
            } else {
                detail
            },
        },
        _ => ServiceError::Status {
            service,
            status: status.as_u16(),
            detail,
        },
    }
}

pub fn transport_error(service: &'static str, err: reqwest::Error) -> ServiceError {
    ServiceError::Transport {
        service,
        detail: err.to_string(),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_LEN {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_DETAIL_LEN).collect();
    format!("{}…", cut)
}
