//! auth::vault
//!
//! Persisting the credential pair between CLI runs.

use tracing::debug;

use super::errors::VaultError;
use crate::secrets::SecretStore;
use crate::session::SessionState;

/// Secret key for the access credential.
pub const ACCESS_TOKEN_KEY: &str = "autoplaylist.access_token";

/// Secret key for the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "autoplaylist.refresh_token";

/// Moves credentials between a [`SecretStore`] and a [`SessionState`].
pub struct CredentialVault {
    store: Box<dyn SecretStore>,
}

impl CredentialVault {
    pub fn new(store: Box<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Load stored credentials into `session`.
    ///
    /// Returns `true` if an access credential was found. A stored refresh
    /// credential without an access credential is ignored.
    pub fn load(&self, session: &SessionState) -> Result<bool, VaultError> {
        let Some(access) = self.store.get(ACCESS_TOKEN_KEY)? else {
            debug!("no stored credentials");
            return Ok(false);
        };
        let refresh = self.store.get(REFRESH_TOKEN_KEY)?.unwrap_or_default();
        session.set_credential_pair(access, refresh);
        debug!("loaded stored credentials");
        Ok(true)
    }

    /// Write the session's current credentials, or remove them if the
    /// session holds none.
    pub fn save(&self, session: &SessionState) -> Result<(), VaultError> {
        let credentials = session.credentials();
        let Some(access) = credentials.access_token else {
            return self.delete();
        };

        self.store.set(ACCESS_TOKEN_KEY, &access)?;
        match credentials.refresh_token {
            Some(refresh) => self.store.set(REFRESH_TOKEN_KEY, &refresh)?,
            None => self.store.delete(REFRESH_TOKEN_KEY)?,
        }
        debug!("stored credentials");
        Ok(())
    }

    /// Remove both credentials. Succeeds when nothing is stored.
    pub fn delete(&self) -> Result<(), VaultError> {
        self.store.delete(ACCESS_TOKEN_KEY)?;
        self.store.delete(REFRESH_TOKEN_KEY)?;
        debug!("removed stored credentials");
        Ok(())
    }

    /// True if an access credential is stored.
    pub fn has_credentials(&self) -> Result<bool, VaultError> {
        Ok(self.store.exists(ACCESS_TOKEN_KEY)?)
    }
}
