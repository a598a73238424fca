//! auth::errors

use thiserror::Error;

use crate::secrets::SecretError;

/// Errors from reading a login callback.
///
/// The offending input is not echoed: a malformed callback may still
/// carry a credential.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// Input is neither an absolute URL nor a query string.
    #[error("not a callback URL: {0}")]
    InvalidUrl(String),

    /// Input was empty.
    #[error("no callback URL given")]
    Empty,
}

/// Errors from persisting credentials.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("credential storage failed: {0}")]
    Store(#[from] SecretError),
}
