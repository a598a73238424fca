//! api::mock
//!
//! In-memory backend for deterministic tests.
//!
//! # Example
//!
//! ```
//! use autoplaylist::api::mock::MockBackend;
//! use autoplaylist::api::PlaylistBackend;
//! use autoplaylist::session::{Playlist, PlaylistKind};
//!
//! # tokio_test::block_on(async {
//! let backend = MockBackend::new().with_playlists(vec![Playlist {
//!     id: "liked".to_string(),
//!     name: "Liked Songs".to_string(),
//!     track_count: 3,
//!     kind: PlaylistKind::Liked,
//! }]);
//!
//! let playlists = backend.playlists().await.unwrap();
//! assert_eq!(playlists[0].name, "Liked Songs");
//! # });
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::errors::ApiError;
use super::traits::PlaylistBackend;
use super::types::{
    CreatePlaylistsRequest, CreatePlaylistsResponse, CreatedPlaylist, GenerateRequest,
    GenerateResponse,
};
use crate::session::{Playlist, Track};

/// Which operation should fail, and with which HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Playlists(u16),
    Tracks(u16),
    Generate(u16),
    CreatePlaylists(u16),
}

/// Recorded call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Playlists,
    Tracks { playlist_ids: Vec<String> },
    Generate(GenerateRequest),
    CreatePlaylists(CreatePlaylistsRequest),
}

#[derive(Debug, Default)]
struct MockBackendInner {
    playlists: Vec<Playlist>,
    tracks: Vec<Track>,
    generated: GenerateResponse,
    next_playlist_id: u64,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Mock backend. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockBackendInner>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_playlists(self, playlists: Vec<Playlist>) -> Self {
        self.lock().playlists = playlists;
        self
    }

    /// Tracks served by `tracks()`, filtered by `playlist_source`.
    pub fn with_tracks(self, tracks: Vec<Track>) -> Self {
        self.lock().tracks = tracks;
        self
    }

    /// Canned response for `generate()`.
    pub fn with_generated(self, generated: GenerateResponse) -> Self {
        self.lock().generated = generated;
        self
    }

    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockBackendInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call, then fail if configured to.
    fn enter(&self, op: MockOperation) -> Result<(), ApiError> {
        let mut inner = self.lock();
        let failure = match (&op, inner.fail_on) {
            (MockOperation::Playlists, Some(FailOn::Playlists(s))) => Some(("playlists", s)),
            (MockOperation::Tracks { .. }, Some(FailOn::Tracks(s))) => Some(("tracks", s)),
            (MockOperation::Generate(_), Some(FailOn::Generate(s))) => Some(("generate", s)),
            (MockOperation::CreatePlaylists(_), Some(FailOn::CreatePlaylists(s))) => {
                Some(("create-playlists", s))
            }
            _ => None,
        };
        inner.operations.push(op);

        match failure {
            Some((operation, status)) => Err(ApiError::Status {
                operation,
                status,
                message: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlaylistBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        self.enter(MockOperation::Playlists)?;
        Ok(self.lock().playlists.clone())
    }

    async fn tracks(&self, playlist_ids: &[String]) -> Result<Vec<Track>, ApiError> {
        self.enter(MockOperation::Tracks {
            playlist_ids: playlist_ids.to_vec(),
        })?;
        let inner = self.lock();
        Ok(inner
            .tracks
            .iter()
            .filter(|t| {
                t.playlist_source
                    .as_ref()
                    .is_some_and(|src| playlist_ids.contains(src))
            })
            .cloned()
            .collect())
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        self.enter(MockOperation::Generate(request.clone()))?;
        Ok(self.lock().generated.clone())
    }

    async fn create_playlists(
        &self,
        request: &CreatePlaylistsRequest,
    ) -> Result<CreatePlaylistsResponse, ApiError> {
        self.enter(MockOperation::CreatePlaylists(request.clone()))?;
        let mut inner = self.lock();
        let mut created = Vec::new();
        // Drafts without tracks are skipped, like the real service.
        for draft in request.playlists.iter().filter(|d| !d.track_ids.is_empty()) {
            inner.next_playlist_id += 1;
            created.push(CreatedPlaylist {
                name: draft.name.clone(),
                playlist_id: format!("mock-{}", inner.next_playlist_id),
                track_count: draft.track_ids.len() as u64,
            });
        }
        Ok(CreatePlaylistsResponse {
            status: Some("ok".to_string()),
            created,
        })
    }
}
