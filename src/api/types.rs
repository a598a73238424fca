//! api::types
//!
//! Request and response bodies of the generation backend.

use serde::{Deserialize, Serialize};

use crate::session::{EnabledGenerators, GeneratedResults, GeneratorSettings, TrackDetails};

/// Options block of a `/generate` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub genre: bool,
    pub language: bool,
    pub artist: bool,
    pub allow_duplicates: bool,
    pub artist_min_appearances: u32,
    pub max_genres: u32,
    pub max_languages: u32,
    pub max_artists: u32,
}

impl GenerateOptions {
    pub fn new(enabled: EnabledGenerators, settings: GeneratorSettings) -> Self {
        Self {
            genre: enabled.genre,
            language: enabled.language,
            artist: enabled.artist,
            allow_duplicates: settings.allow_duplicates,
            artist_min_appearances: settings.artist_min_appearances,
            max_genres: settings.max_genres,
            max_languages: settings.max_languages,
            max_artists: settings.max_artists,
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new(EnabledGenerators::default(), GeneratorSettings::default())
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub playlist_ids: Vec<String>,
    pub options: GenerateOptions,
}

/// Response of `POST /generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub results: GeneratedResults,
    #[serde(default)]
    pub track_details: TrackDetails,
}

/// One playlist to create on the music service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDraft {
    pub name: String,
    pub track_ids: Vec<String>,
}

/// Body of `POST /create-playlists`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylistsRequest {
    pub playlists: Vec<PlaylistDraft>,
}

/// A playlist the backend created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPlaylist {
    pub name: String,
    pub playlist_id: String,
    pub track_count: u64,
}

/// Response of `POST /create-playlists`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylistsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created: Vec<CreatedPlaylist>,
}

/// FastAPI-style error body (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}
