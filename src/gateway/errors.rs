//! gateway::errors
//!
//! Error types for the request gateway.
//!
//! # Security
//!
//! Messages never include credential values. The only credential-related
//! variant ([`GatewayError::InvalidCredential`]) names the problem, not the
//! token.

use thiserror::Error;

/// Errors surfaced to gateway callers.
///
/// HTTP failures are not errors: any status, including an unrecoverable
/// 401, comes back as a response. Only transport-level failures and
/// malformed requests end up here.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The call could not be completed (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The base URL and path do not form a valid URL.
    #[error("invalid request URL '{0}'")]
    InvalidUrl(String),

    /// The access credential contains bytes not allowed in a header.
    #[error("access credential cannot be sent as an Authorization header")]
    InvalidCredential,

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GatewayError {
    /// True for failures of the underlying network call.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

/// Failure of the `/refresh` sub-call.
///
/// Never returned to gateway callers. Every variant except
/// `MissingRefreshToken` ends the session; that one means it already ended.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The refresh credential was removed after the 401 arrived.
    #[error("no refresh credential available")]
    MissingRefreshToken,

    /// The refresh call itself failed at the transport level.
    #[error("refresh request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
    },

    /// The refresh endpoint answered 2xx but without a usable access credential.
    #[error("invalid refresh response: {0}")]
    InvalidResponse(String),
}
