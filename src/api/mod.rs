//! api
//!
//! Typed access to the playlist-generation backend.
//!
//! # Components
//!
//! - [`PlaylistBackend`] - async trait over the backend operations
//! - [`HttpBackend`] - implementation issuing every call through the gateway
//! - [`mock::MockBackend`] - in-memory implementation for tests
//!
//! The free functions in this module tie backend calls to the session:
//! fetched playlists and generated results are written back so every
//! consumer of the session sees them.

mod errors;
pub mod http;
pub mod mock;
mod traits;
pub mod types;

pub use errors::ApiError;
pub use http::HttpBackend;
pub use traits::PlaylistBackend;
pub use types::{
    CreatePlaylistsRequest, CreatePlaylistsResponse, CreatedPlaylist, GenerateOptions,
    GenerateRequest, GenerateResponse, PlaylistDraft,
};

use tracing::info;

use crate::session::{Playlist, SessionState};

/// Fetch the user's playlists and store them in the session.
pub async fn load_playlists(
    backend: &dyn PlaylistBackend,
    session: &SessionState,
) -> Result<Vec<Playlist>, ApiError> {
    let playlists = backend.playlists().await?;
    session.set_all_playlists(playlists.clone());
    Ok(playlists)
}

/// Build a `/generate` request from the session's selection and preferences.
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] if no playlist is selected or every
/// generator is disabled.
pub fn generate_request_from_session(session: &SessionState) -> Result<GenerateRequest, ApiError> {
    let selected = session.selected_playlists();
    if selected.is_empty() {
        return Err(ApiError::InvalidRequest(
            "select at least one playlist".to_string(),
        ));
    }

    let enabled = session.enabled_generators();
    if !enabled.any() {
        return Err(ApiError::InvalidRequest(
            "enable at least one generator".to_string(),
        ));
    }

    Ok(GenerateRequest {
        playlist_ids: selected.into_iter().map(|p| p.id).collect(),
        options: GenerateOptions::new(enabled, session.generator_settings()),
    })
}

/// Generate groupings for the session's selection and store the results.
pub async fn generate_from_session(
    backend: &dyn PlaylistBackend,
    session: &SessionState,
) -> Result<GenerateResponse, ApiError> {
    let request = generate_request_from_session(session)?;
    let response = backend.generate(&request).await?;
    info!(
        playlists = request.playlist_ids.len(),
        groups = response.results.len(),
        "generation finished"
    );
    session.set_generated_results(response.results.clone(), response.track_details.clone());
    Ok(response)
}
