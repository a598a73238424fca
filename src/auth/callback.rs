//! auth::callback
//!
//! Reading the credential pair out of the login redirect.
//!
//! After the music service authorizes the user, the backend redirects to
//! `<frontend>/callback?token=<access>&refresh=<refresh>`. The CLI has no
//! frontend, so the user pastes that URL (or just its query string).

use std::fmt;

use url::Url;

use super::errors::CallbackError;

/// Base used to parse a bare query string.
const QUERY_BASE: &str = "http://localhost/callback";

/// What the callback carried.
#[derive(Clone, PartialEq, Eq)]
pub enum Callback {
    /// A non-empty access credential was present.
    Authorized {
        access: String,
        refresh: Option<String>,
    },
    /// No access credential; the user should start over.
    Rejected,
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Authorized { refresh, .. } => f
                .debug_struct("Authorized")
                .field("access", &"[REDACTED]")
                .field("refresh", &refresh.as_ref().map(|_| "[REDACTED]"))
                .finish(),
            Callback::Rejected => f.write_str("Rejected"),
        }
    }
}

/// Parse a callback URL, or a bare `?token=..&refresh=..` query string.
///
/// The first `token` and `refresh` parameters are used. An empty `refresh`
/// counts as absent.
pub fn parse_callback(input: &str) -> Result<Callback, CallbackError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CallbackError::Empty);
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let mut url =
                Url::parse(QUERY_BASE).map_err(|e| CallbackError::InvalidUrl(e.to_string()))?;
            url.set_query(Some(input.trim_start_matches('?')));
            url
        }
        Err(e) => return Err(CallbackError::InvalidUrl(e.to_string())),
    };

    let mut access = None;
    let mut refresh = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" if access.is_none() => access = Some(value.into_owned()),
            "refresh" if refresh.is_none() => refresh = Some(value.into_owned()),
            _ => {}
        }
    }

    match access.filter(|a| !a.is_empty()) {
        Some(access) => Ok(Callback::Authorized {
            access,
            refresh: refresh.filter(|r| !r.is_empty()),
        }),
        None => Ok(Callback::Rejected),
    }
}
