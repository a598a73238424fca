//! gateway::refresh
//!
//! The `/refresh` sub-call: exchange a refresh credential for a new access
//! credential.
//!
//! The call carries no Authorization header. The service does not rotate
//! refresh credentials, so only `access_token` is read from the response.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::RefreshError;

/// Path of the refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/refresh";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// POST the refresh credential to `url` and return the new access credential.
///
/// # Errors
///
/// - [`RefreshError::Transport`] if the call does not complete
/// - [`RefreshError::Rejected`] on any non-2xx status
/// - [`RefreshError::InvalidResponse`] if the body lacks a non-empty `access_token`
pub async fn exchange(
    client: &Client,
    url: &str,
    refresh_token: &str,
) -> Result<String, RefreshError> {
    let response = client
        .post(url)
        .json(&RefreshRequest { refresh_token })
        .send()
        .await?;

    let status = response.status();
    debug!(status = status.as_u16(), "refresh endpoint answered");
    if !status.is_success() {
        return Err(RefreshError::Rejected {
            status: status.as_u16(),
        });
    }

    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?;

    if body.access_token.is_empty() {
        return Err(RefreshError::InvalidResponse(
            "empty access_token".to_string(),
        ));
    }

    Ok(body.access_token)
}
