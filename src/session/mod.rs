//! session
//!
//! Process-wide session state: the two credentials plus session-scoped data.
//!
//! # Design
//!
//! [`SessionState`] is an explicit, injectable container. Cloning it yields
//! another handle to the same state, so the gateway, the API layer and the
//! CLI all observe one consistent view. A fresh state is constructed per
//! test.
//!
//! All accessors are synchronous. The internal lock is a std `RwLock` that
//! is never held across an `.await`, so a mutation is always complete
//! before the next suspension point.
//!
//! Credentials are opaque strings. They are never inspected, logged, or
//! included in `Debug` output.
//!
//! # Example
//!
//! ```
//! use autoplaylist::session::SessionState;
//!
//! let session = SessionState::new();
//! session.set_credential_pair("access", "refresh");
//! assert_eq!(session.access_token().as_deref(), Some("access"));
//!
//! session.clear();
//! assert!(session.access_token().is_none());
//! ```

pub mod types;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;

pub use types::{
    ArtistRef, EnabledGenerators, GeneratedResults, GeneratorKind, GeneratorSettings, Playlist,
    PlaylistKind, SettingsPatch, Track, TrackDetail, TrackDetails, MIN_ARTIST_APPEARANCES,
};

/// Whether the session currently holds an access credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Anonymous,
}

/// Snapshot of the credential pair.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    fn status(&self) -> AuthStatus {
        if self.access_token.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Debug, Default)]
struct SessionData {
    credentials: Credentials,
    all_playlists: Vec<Playlist>,
    selected_playlists: Vec<Playlist>,
    enabled_generators: EnabledGenerators,
    generator_settings: GeneratorSettings,
    generated_results: Option<GeneratedResults>,
    track_details: TrackDetails,
}

struct Shared {
    data: RwLock<SessionData>,
    status: watch::Sender<AuthStatus>,
}

/// Shared handle to the session.
#[derive(Clone)]
pub struct SessionState {
    shared: Arc<Shared>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("data", &*self.read())
            .finish()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create an empty session (no credentials, no data, default settings).
    pub fn new() -> Self {
        let (status, _) = watch::channel(AuthStatus::Anonymous);
        Self {
            shared: Arc::new(Shared {
                data: RwLock::new(SessionData::default()),
                status,
            }),
        }
    }

    /// Create a session whose generator preferences start from the given values.
    pub fn with_preferences(generators: EnabledGenerators, settings: GeneratorSettings) -> Self {
        let session = Self::new();
        {
            let mut data = session.write();
            data.enabled_generators = generators;
            data.generator_settings = settings;
        }
        session
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionData> {
        self.shared.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionData> {
        self.shared.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a credential mutation and publish the resulting auth status.
    fn update_credentials(&self, f: impl FnOnce(&mut SessionData)) {
        let status = {
            let mut data = self.write();
            f(&mut data);
            data.credentials.status()
        };
        self.shared.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Current access credential.
    pub fn access_token(&self) -> Option<String> {
        self.read().credentials.access_token.clone()
    }

    /// Current refresh credential.
    pub fn refresh_token(&self) -> Option<String> {
        self.read().credentials.refresh_token.clone()
    }

    /// Snapshot of both credentials.
    pub fn credentials(&self) -> Credentials {
        self.read().credentials.clone()
    }

    /// True iff an access credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.read().credentials.access_token.is_some()
    }

    /// Replace the access credential only.
    pub fn set_access_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.update_credentials(|data| data.credentials.access_token = Some(token));
    }

    /// Replace both credentials, as delivered by the login callback.
    ///
    /// An empty refresh credential is stored as absent.
    pub fn set_credential_pair(&self, access: impl Into<String>, refresh: impl Into<String>) {
        let access = access.into();
        let refresh = Some(refresh.into()).filter(|r| !r.is_empty());
        self.update_credentials(|data| {
            data.credentials = Credentials {
                access_token: Some(access),
                refresh_token: refresh,
            };
        });
    }

    /// Full session reset: credentials and all session-derived data.
    ///
    /// Generator toggles and settings are preferences and are kept.
    /// Calling this on an already empty session is a no-op.
    pub fn clear(&self) {
        self.update_credentials(|data| {
            data.credentials = Credentials::default();
            data.all_playlists.clear();
            data.selected_playlists.clear();
            data.generated_results = None;
            data.track_details.clear();
        });
    }

    /// Observe auth status changes.
    ///
    /// The receiver's current value is the status at subscription time.
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.shared.status.subscribe()
    }

    // =========================================================================
    // Playlists
    // =========================================================================

    pub fn all_playlists(&self) -> Vec<Playlist> {
        self.read().all_playlists.clone()
    }

    pub fn set_all_playlists(&self, playlists: Vec<Playlist>) {
        self.write().all_playlists = playlists;
    }

    pub fn selected_playlists(&self) -> Vec<Playlist> {
        self.read().selected_playlists.clone()
    }

    /// Select a playlist. Selecting an already-selected id does nothing.
    pub fn select_playlist(&self, playlist: Playlist) {
        let mut data = self.write();
        if !data.selected_playlists.iter().any(|p| p.id == playlist.id) {
            data.selected_playlists.push(playlist);
        }
    }

    /// Deselect by id. Unknown ids are ignored.
    pub fn deselect_playlist(&self, id: &str) {
        self.write().selected_playlists.retain(|p| p.id != id);
    }

    // =========================================================================
    // Generator preferences
    // =========================================================================

    pub fn enabled_generators(&self) -> EnabledGenerators {
        self.read().enabled_generators
    }

    pub fn toggle_generator(&self, kind: GeneratorKind) {
        self.write().enabled_generators.toggle(kind);
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        self.read().generator_settings
    }

    pub fn update_generator_settings(&self, patch: SettingsPatch) {
        self.write().generator_settings.apply(patch);
    }

    // =========================================================================
    // Results
    // =========================================================================

    pub fn generated_results(&self) -> Option<GeneratedResults> {
        self.read().generated_results.clone()
    }

    pub fn track_details(&self) -> TrackDetails {
        self.read().track_details.clone()
    }

    pub fn set_generated_results(&self, results: GeneratedResults, details: TrackDetails) {
        let mut data = self.write();
        data.generated_results = Some(results);
        data.track_details = details;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(id: &str) -> Playlist {
        Playlist {
            id: id.to_string(),
            name: format!("Playlist {}", id),
            track_count: 10,
            kind: PlaylistKind::Playlist,
        }
    }

    #[test]
    fn starts_empty() {
        let s = SessionState::new();
        assert!(s.access_token().is_none());
        assert!(s.refresh_token().is_none());
        assert!(!s.is_authenticated());
        assert!(s.all_playlists().is_empty());
        assert!(s.generated_results().is_none());
    }

    #[test]
    fn credential_pair_round_trip() {
        let s = SessionState::new();
        s.set_credential_pair("a", "r");
        assert_eq!(s.access_token().as_deref(), Some("a"));
        assert_eq!(s.refresh_token().as_deref(), Some("r"));
        assert!(s.is_authenticated());
    }

    #[test]
    fn empty_refresh_is_absent() {
        let s = SessionState::new();
        s.set_credential_pair("a", "");
        assert_eq!(s.access_token().as_deref(), Some("a"));
        assert!(s.refresh_token().is_none());
    }

    #[test]
    fn set_access_token_keeps_refresh() {
        let s = SessionState::new();
        s.set_credential_pair("a", "r");
        s.set_access_token("a2");
        assert_eq!(s.access_token().as_deref(), Some("a2"));
        assert_eq!(s.refresh_token().as_deref(), Some("r"));
    }

    #[test]
    fn clones_share_state() {
        let s = SessionState::new();
        let other = s.clone();
        other.set_credential_pair("a", "r");
        assert_eq!(s.access_token().as_deref(), Some("a"));
    }

    #[test]
    fn clear_resets_session_data() {
        let s = SessionState::new();
        s.set_credential_pair("a", "r");
        s.set_all_playlists(vec![playlist("1"), playlist("2")]);
        s.select_playlist(playlist("1"));
        s.set_generated_results(GeneratedResults::default(), TrackDetails::new());

        s.clear();

        assert!(s.access_token().is_none());
        assert!(s.refresh_token().is_none());
        assert!(s.all_playlists().is_empty());
        assert!(s.selected_playlists().is_empty());
        assert!(s.generated_results().is_none());
        assert!(s.track_details().is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let s = SessionState::new();
        s.clear();
        s.clear();
        assert!(s.credentials() == Credentials::default());
    }

    #[test]
    fn clear_keeps_preferences() {
        let s = SessionState::new();
        s.toggle_generator(GeneratorKind::Artist);
        s.update_generator_settings(SettingsPatch {
            max_genres: Some(9),
            ..Default::default()
        });
        s.clear();
        assert!(!s.enabled_generators().artist);
        assert_eq!(s.generator_settings().max_genres, 9);
    }

    #[test]
    fn select_playlist_ignores_duplicates() {
        let s = SessionState::new();
        s.select_playlist(playlist("1"));
        s.select_playlist(playlist("1"));
        s.select_playlist(playlist("2"));
        assert_eq!(s.selected_playlists().len(), 2);

        s.deselect_playlist("1");
        s.deselect_playlist("missing");
        let ids: Vec<_> = s.selected_playlists().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn subscribe_sees_login_and_logout() {
        let s = SessionState::new();
        let mut rx = s.subscribe();
        assert_eq!(*rx.borrow(), AuthStatus::Anonymous);

        s.set_credential_pair("a", "r");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthStatus::Authenticated);

        // Replacing the access token does not change the status.
        s.set_access_token("a2");
        assert!(!rx.has_changed().unwrap());

        s.clear();
        assert_eq!(*rx.borrow_and_update(), AuthStatus::Anonymous);
    }

    #[test]
    fn debug_redacts_tokens() {
        let s = SessionState::new();
        s.set_credential_pair("secret-access", "secret-refresh");
        let debug = format!("{:?}", s);
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
        assert!(debug.contains("[REDACTED]"));
    }
}
