//! cli::context
//!
//! Per-invocation state shared by command handlers: effective config, the
//! session, the credential vault, and whether the session was terminated
//! during the command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};

use super::output::{self, Verbosity};
use crate::api::HttpBackend;
use crate::auth::CredentialVault;
use crate::config::Config;
use crate::gateway::{Gateway, TerminationReason};
use crate::secrets::{self, SecretStore};
use crate::session::SessionState;

/// Message shown when the gateway gives up on the session.
pub const SESSION_EXPIRED: &str = "session expired; run 'ap login'";

pub struct Context {
    pub verbosity: Verbosity,
    pub config: Config,
    pub session: SessionState,
    pub vault: CredentialVault,
    terminated: Arc<AtomicBool>,
}

impl Context {
    /// Load config and secrets the way the binary does.
    pub fn load(base_url: Option<String>, verbosity: Verbosity) -> Result<Self> {
        let config = Config::load()
            .context("Failed to load configuration")?
            .override_base_url(base_url)
            .context("Invalid --base-url")?;
        let store = secrets::create_store(config.secrets_provider())
            .context("Failed to initialize secret store")?;
        Self::new(config, store, verbosity)
    }

    /// Build a context over an explicit config and secret store, loading any
    /// stored credentials into a fresh session.
    pub fn new(config: Config, store: Box<dyn SecretStore>, verbosity: Verbosity) -> Result<Self> {
        let session =
            SessionState::with_preferences(config.enabled_generators(), config.generator_settings());
        let vault = CredentialVault::new(store);
        vault
            .load(&session)
            .context("Failed to read stored credentials")?;

        Ok(Self {
            verbosity,
            config,
            session,
            vault,
            terminated: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Backend client whose gateway reports session termination to the user.
    pub fn backend(&self) -> HttpBackend {
        let flag = Arc::clone(&self.terminated);
        let gateway = Gateway::new(self.config.base_url(), self.session.clone())
            .with_refresh_policy(self.config.refresh_policy())
            .on_session_terminated(move |reason: TerminationReason| {
                // Only the first termination is reported.
                if !flag.swap(true, Ordering::SeqCst) {
                    tracing::debug!(%reason, "terminated handler invoked");
                    output::error(SESSION_EXPIRED);
                }
            });
        HttpBackend::new(Arc::new(gateway))
    }

    /// True once the gateway has terminated the session.
    pub fn session_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Fail early for commands that need credentials.
    pub fn require_login(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            bail!("not logged in; run 'ap login'");
        }
        Ok(())
    }

    /// Write the session's credentials back to the vault.
    pub fn persist(&self) -> Result<()> {
        self.vault
            .save(&self.session)
            .context("Failed to store credentials")
    }

    pub fn quiet(&self) -> bool {
        self.verbosity.is_quiet()
    }
}
