//! gateway
//!
//! The authenticated request gateway: the single path every backend call
//! takes.
//!
//! # Protocol
//!
//! For each [`Gateway::request`]:
//!
//! 1. Read the access credential from the session and attach
//!    `Authorization: Bearer <token>` when present. `Content-Type:
//!    application/json` is added unless the caller set one.
//! 2. Send the call. Any status other than 401 is returned unmodified.
//! 3. On 401 without a refresh credential, the session is terminated and the
//!    401 is returned.
//! 4. On 401 with a refresh credential, `POST /refresh` is issued. If it
//!    fails in any way the session is terminated and the original 401 is
//!    returned. Otherwise the new access credential is written to the
//!    session and the original call is replayed once, byte for byte. The
//!    replayed response is returned whatever its status.
//!
//! The three network calls of one invocation are strictly sequential. See
//! [`phase`] for the state machine that drives them.
//!
//! Terminating a session means [`SessionState::clear`] followed by the
//! [`SessionTerminated`] handler, which decides what "go back to login"
//! means for the host application. The handler fires once per termination:
//! an invocation whose credential was cleared by a concurrent termination
//! returns its 401 without clearing or notifying again.
//!
//! # Concurrency
//!
//! Under [`RefreshPolicy::Independent`] concurrent invocations that hit 401
//! each refresh on their own and the last write wins.
//! [`RefreshPolicy::SingleFlight`] serializes refreshes of one `Gateway`
//! (share it behind an `Arc`) and skips the `/refresh` call when another
//! invocation already replaced the credential.
//!
//! # Example
//!
//! ```no_run
//! use autoplaylist::gateway::{ApiRequest, Gateway, TerminationReason};
//! use autoplaylist::session::SessionState;
//!
//! # async fn demo() -> Result<(), autoplaylist::gateway::GatewayError> {
//! let session = SessionState::new();
//! session.set_credential_pair("access", "refresh");
//!
//! let gateway = Gateway::new("http://127.0.0.1:8888", session)
//!     .on_session_terminated(|reason: TerminationReason| eprintln!("logged out: {reason}"));
//!
//! let response = gateway.request("/playlists", ApiRequest::get()).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

mod errors;
pub mod phase;
pub mod refresh;

pub use errors::{GatewayError, RefreshError};
pub use phase::{Outcome, Phase};

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::session::SessionState;

/// Why a session was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// A 401 arrived and there was no refresh credential to use.
    NoRefreshToken,
    /// The `/refresh` call failed.
    RefreshFailed,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TerminationReason::NoRefreshToken => "authorization expired and no refresh credential",
            TerminationReason::RefreshFailed => "authorization expired and refresh failed",
        })
    }
}

/// Signal raised after the gateway cleared the session.
///
/// The host decides what leaving the authenticated area means: a CLI
/// prints a hint, a UI navigates to its entry point.
pub trait SessionTerminated: Send + Sync {
    fn session_terminated(&self, reason: TerminationReason);
}

impl<F> SessionTerminated for F
where
    F: Fn(TerminationReason) + Send + Sync,
{
    fn session_terminated(&self, reason: TerminationReason) {
        self(reason)
    }
}

/// How concurrent refreshes on one gateway relate to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Every invocation that sees a 401 refreshes on its own.
    #[default]
    Independent,
    /// Refreshes are serialized; late arrivals reuse a credential that was
    /// already replaced.
    SingleFlight,
}

impl RefreshPolicy {
    /// Names accepted in configuration.
    pub const NAMES: [&'static str; 2] = ["independent", "single_flight"];
}

/// A replayable request description.
///
/// The body is held as bytes so the exact same payload can be sent again
/// on retry.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Default for ApiRequest {
    fn default() -> Self {
        Self::get()
    }
}

impl ApiRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, GatewayError> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }

    /// Use raw bytes as the body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a caller header. Later values for the same name replace earlier ones.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// The authenticated request gateway.
pub struct Gateway {
    client: Client,
    base_url: String,
    session: SessionState,
    terminated: Option<Arc<dyn SessionTerminated>>,
    policy: RefreshPolicy,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .field("has_terminated_handler", &self.terminated.is_some())
            .finish()
    }
}

impl Gateway {
    /// Create a gateway for `base_url` reading credentials from `session`.
    pub fn new(base_url: impl Into<String>, session: SessionState) -> Self {
        Self::with_client(Client::new(), base_url, session)
    }

    /// Create a gateway with a preconfigured HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>, session: SessionState) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session,
            terminated: None,
            policy: RefreshPolicy::default(),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Install the handler invoked after the session is terminated.
    pub fn on_session_terminated(mut self, handler: impl SessionTerminated + 'static) -> Self {
        self.terminated = Some(Arc::new(handler));
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Absolute URL for a backend path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue `request` against `path`, refreshing and retrying once on 401.
    ///
    /// Returns a response on every HTTP outcome; callers inspect the status.
    ///
    /// # Errors
    ///
    /// Transport failures of the original or the replayed call, an invalid
    /// URL, or a credential that cannot be encoded as a header.
    pub async fn request(&self, path: &str, request: ApiRequest) -> Result<Response, GatewayError> {
        let url = self.url(path);
        let mut phase = Phase::Attempt;

        let sent_with = self.session.access_token();
        debug!(method = %request.method, path, authenticated = sent_with.is_some(), "sending request");
        let original = self.send(&url, &request, sent_with.as_deref()).await?;

        phase = phase.on_response(original.status(), self.session.refresh_token().is_some());
        debug!(path, status = original.status().as_u16(), ?phase, "response received");
        if let Phase::Done(outcome) = phase {
            if outcome == Outcome::Terminated && self.ended_elsewhere(sent_with.as_deref()) {
                debug!(path, "session already ended by a concurrent request");
                return Ok(original);
            }
            return Ok(self.finish(outcome, original, TerminationReason::NoRefreshToken));
        }

        let refreshed = self.refresh(sent_with.as_deref()).await;
        phase = phase.on_refresh(refreshed.is_ok());
        let token = match refreshed {
            Ok(token) => token,
            Err(RefreshError::MissingRefreshToken) => {
                // A concurrent invocation already ended the session and
                // notified the host.
                debug!(path, "session ended while waiting to refresh");
                return Ok(original);
            }
            Err(err) => {
                warn!(path, error = %err, "credential refresh failed");
                return Ok(self.finish(Outcome::Terminated, original, TerminationReason::RefreshFailed));
            }
        };

        debug!(path, ?phase, "replaying request with refreshed credential");
        let retried = self.send(&url, &request, Some(&token)).await?;
        phase = phase.on_response(retried.status(), false);
        debug!(path, status = retried.status().as_u16(), ?phase, "retry completed");
        Ok(retried)
    }

    fn finish(&self, outcome: Outcome, response: Response, reason: TerminationReason) -> Response {
        if outcome == Outcome::Terminated {
            self.terminate(reason);
        }
        response
    }

    /// The call carried a credential that has since been cleared.
    fn ended_elsewhere(&self, sent_with: Option<&str>) -> bool {
        sent_with.is_some() && !self.session.is_authenticated()
    }

    fn terminate(&self, reason: TerminationReason) {
        warn!(%reason, "session terminated");
        self.session.clear();
        if let Some(handler) = &self.terminated {
            handler.session_terminated(reason);
        }
    }

    /// Run the refresh sub-protocol according to the configured policy.
    ///
    /// `sent_with` is the access credential the failed call carried.
    async fn refresh(&self, sent_with: Option<&str>) -> Result<String, RefreshError> {
        match self.policy {
            RefreshPolicy::Independent => self.refresh_now().await,
            RefreshPolicy::SingleFlight => {
                let _guard = self.refresh_lock.lock().await;

                // Another invocation may have refreshed while we waited.
                if let Some(current) = self.session.access_token() {
                    if Some(current.as_str()) != sent_with {
                        debug!("reusing credential refreshed by a concurrent request");
                        return Ok(current);
                    }
                }
                self.refresh_now().await
            }
        }
    }

    async fn refresh_now(&self) -> Result<String, RefreshError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(RefreshError::MissingRefreshToken)?;

        let url = self.url(refresh::REFRESH_PATH);
        let token = refresh::exchange(&self.client, &url, &refresh_token).await?;
        self.session.set_access_token(token.clone());
        debug!("access credential refreshed");
        Ok(token)
    }

    /// Send one attempt of `request` with the given access credential.
    async fn send(
        &self,
        url: &str,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, GatewayError> {
        let url = reqwest::Url::parse(url).map_err(|_| GatewayError::InvalidUrl(url.to_string()))?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(build_headers(&request.headers, token)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        Ok(builder.send().await?)
    }
}

/// Merge caller headers with the gateway's.
///
/// The bearer credential replaces any caller Authorization header when a
/// credential is present; content type is only filled in when missing.
fn build_headers(caller: &HeaderMap, token: Option<&str>) -> Result<HeaderMap, GatewayError> {
    let mut headers = caller.clone();

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GatewayError::InvalidCredential)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_when_token_present() {
        let headers = build_headers(&HeaderMap::new(), Some("t1")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t1");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn no_authorization_without_token() {
        let headers = build_headers(&HeaderMap::new(), None).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn caller_content_type_is_kept() {
        let mut caller = HeaderMap::new();
        caller.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        caller.insert("x-trace", HeaderValue::from_static("abc"));
        let headers = build_headers(&caller, Some("t1")).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn bearer_overrides_caller_authorization() {
        let mut caller = HeaderMap::new();
        caller.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        let headers = build_headers(&caller, Some("t1")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t1");
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let err = build_headers(&HeaderMap::new(), Some("bad\ntoken")).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidCredential));
    }

    #[test]
    fn url_joins_with_and_without_slash() {
        let gw = Gateway::new("http://localhost:8888/", SessionState::new());
        assert_eq!(gw.base_url(), "http://localhost:8888");
        assert_eq!(gw.url("/playlists"), "http://localhost:8888/playlists");
        assert_eq!(gw.url("playlists"), "http://localhost:8888/playlists");
    }

    #[test]
    fn request_body_is_replayable() {
        let req = ApiRequest::post().json(&serde_json::json!({"x": 1})).unwrap();
        let copy = req.clone();
        assert_eq!(req.body_bytes(), copy.body_bytes());
        assert_eq!(req.body_bytes().unwrap(), br#"{"x":1}"#);
        assert_eq!(*req.method(), Method::POST);
    }

    #[test]
    fn refresh_policy_names() {
        let p: RefreshPolicy = serde_json::from_str(r#""single_flight""#).unwrap();
        assert_eq!(p, RefreshPolicy::SingleFlight);
        assert_eq!(RefreshPolicy::default(), RefreshPolicy::Independent);
    }

    #[test]
    fn closures_are_termination_handlers() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = move |_reason: TerminationReason| {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        handler.session_terminated(TerminationReason::RefreshFailed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
