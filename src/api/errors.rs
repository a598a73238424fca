//! api::errors

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors from typed backend operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway could not complete the call.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The backend answered with a non-2xx status.
    #[error("{operation} failed with status {status}: {message}")]
    Status {
        /// Operation name (e.g. "generate")
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Message from the error body, if any
        message: String,
    },

    /// The backend answered 2xx with a body we could not parse.
    #[error("invalid {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// The request cannot be sent as described.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status of a failed call, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the call ended unauthorized (the session has been terminated).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
