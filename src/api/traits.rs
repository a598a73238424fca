//! api::traits
//!
//! Backend trait for the playlist-generation service.
//!
//! # Design
//!
//! The trait is async because every operation is a network call. The HTTP
//! implementation routes all calls through the [`Gateway`], so credential
//! handling is invisible at this level. A mock implementation backs the
//! workflow tests.
//!
//! [`Gateway`]: crate::gateway::Gateway

use async_trait::async_trait;

use super::errors::ApiError;
use super::types::{CreatePlaylistsRequest, CreatePlaylistsResponse, GenerateRequest, GenerateResponse};
use crate::session::{Playlist, Track};

/// Operations offered by the generation backend.
#[async_trait]
pub trait PlaylistBackend: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// All of the user's playlists, liked songs first.
    async fn playlists(&self) -> Result<Vec<Playlist>, ApiError>;

    /// Tracks of the given playlists, tagged with their source playlist.
    async fn tracks(&self, playlist_ids: &[String]) -> Result<Vec<Track>, ApiError>;

    /// Run the grouping generators over the given playlists.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;

    /// Create the given playlists on the music service.
    async fn create_playlists(
        &self,
        request: &CreatePlaylistsRequest,
    ) -> Result<CreatePlaylistsResponse, ApiError>;
}
