//! secrets::traits
//!
//! Key-value interface for credential storage.
//!
//! Keys are dotted and namespaced (`autoplaylist.access_token`). Values are
//! opaque. Implementations never log values or put them in errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Messages name the key or path involved, never the stored value.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Store could not be read or parsed.
    #[error("failed to read secrets: {0}")]
    Read(String),

    /// Store could not be written.
    #[error("failed to write secrets: {0}")]
    Write(String),

    /// Secrets file is readable by other users.
    #[error("secrets file '{}' has mode {mode:o}, expected 600", path.display())]
    InsecurePermissions { path: PathBuf, mode: u32 },

    /// Unknown or unavailable provider name.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Storage for secrets, shared across threads.
pub trait SecretStore: Send + Sync {
    /// Value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Insert or overwrite `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failure() {
        let err = SecretError::Read("cannot parse".into());
        assert!(err.to_string().contains("read"));

        let err = SecretError::Write("disk full".into());
        assert!(err.to_string().contains("write"));

        let err = SecretError::InsecurePermissions {
            path: PathBuf::from("/tmp/secrets.toml"),
            mode: 0o644,
        };
        let msg = err.to_string();
        assert!(msg.contains("644"));
        assert!(msg.contains("/tmp/secrets.toml"));

        let err = SecretError::ProviderNotAvailable("keychain".into());
        assert!(err.to_string().contains("keychain"));
    }
}
