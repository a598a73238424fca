//! secrets
//!
//! Storage for the credential pair between CLI runs.
//!
//! - [`FileSecretStore`]: TOML file at `~/.autoplaylist/secrets.toml`
//! - [`MemorySecretStore`]: process-local map, nothing touches disk
//!
//! Select a store by name with [`create_store`]:
//!
//! ```
//! use autoplaylist::secrets::{create_store, SecretStore};
//!
//! let store = create_store("memory").unwrap();
//! store.set("autoplaylist.access_token", "opaque").unwrap();
//! assert!(store.exists("autoplaylist.access_token").unwrap());
//! ```

mod file_store;
mod memory_store;
mod traits;

pub use file_store::FileSecretStore;
pub use memory_store::MemorySecretStore;
pub use traits::{SecretError, SecretStore};

/// Provider used when the config names none.
pub const DEFAULT_PROVIDER: &str = "file";

/// Provider names accepted by [`create_store`].
pub const PROVIDERS: &[&str] = &["file", "memory"];

/// Create a secret store by provider name.
///
/// # Errors
///
/// [`SecretError::ProviderNotAvailable`] for an unknown name, or the
/// store's own initialization error.
pub fn create_store(provider: &str) -> Result<Box<dyn SecretStore>, SecretError> {
    match provider {
        "file" => Ok(Box::new(FileSecretStore::new()?)),
        "memory" => Ok(Box::new(MemorySecretStore::new())),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider '{}' (valid: {})",
            other,
            PROVIDERS.join(", ")
        ))),
    }
}
