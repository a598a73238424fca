//! auth
//!
//! Delegated login and credential persistence.
//!
//! # Flow
//!
//! 1. The user opens [`login_url`]; the backend redirects to the music
//!    service, which redirects back through the backend's `/callback`.
//! 2. The backend redirects to a callback URL carrying `token` and
//!    `refresh` query parameters.
//! 3. [`complete_login`] parses that URL and stores the pair in the session.
//! 4. [`CredentialVault`] keeps the pair in a secret store between runs.
//!
//! Credentials never appear in logs, errors or `Debug` output.
//!
//! # Example
//!
//! ```
//! use autoplaylist::auth::{complete_login, login_url, Callback};
//! use autoplaylist::session::SessionState;
//!
//! assert_eq!(login_url("http://127.0.0.1:8888/"), "http://127.0.0.1:8888/login");
//!
//! let session = SessionState::new();
//! let outcome = complete_login(&session, "http://localhost/callback?token=t&refresh=r").unwrap();
//! assert!(matches!(outcome, Callback::Authorized { .. }));
//! assert!(session.is_authenticated());
//! ```

mod callback;
mod errors;
mod vault;

pub use callback::{parse_callback, Callback};
pub use errors::{CallbackError, VaultError};
pub use vault::{CredentialVault, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

use tracing::{info, warn};

use crate::session::SessionState;

/// Backend path that starts the login redirect chain.
pub const LOGIN_PATH: &str = "/login";

/// URL the user opens to log in.
pub fn login_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), LOGIN_PATH)
}

/// Apply a login callback to the session.
///
/// On [`Callback::Authorized`] both credentials are replaced. On
/// [`Callback::Rejected`] the session is left untouched.
pub fn complete_login(session: &SessionState, callback_url: &str) -> Result<Callback, CallbackError> {
    let callback = parse_callback(callback_url)?;
    match &callback {
        Callback::Authorized { access, refresh } => {
            session.set_credential_pair(access.as_str(), refresh.clone().unwrap_or_default());
            info!(refresh = refresh.is_some(), "login completed");
        }
        Callback::Rejected => warn!("login callback carried no access credential"),
    }
    Ok(callback)
}
