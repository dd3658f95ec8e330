use crate::utils::error::{AppError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

pub fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// Turns a non-2xx response into [`AppError::UpstreamError`], keeping the body for the logs.
pub async fn ensure_success(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!("{} responded {}: {}", service, status, body);
    Err(AppError::UpstreamError {
        service: service.to_string(),
        status: status.as_u16(),
        body,
    })
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
