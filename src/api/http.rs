//! api::http
//!
//! [`PlaylistBackend`] over HTTP, with every call issued through the
//! [`Gateway`].
//!
//! A response with a failing status becomes [`ApiError::Status`]. This
//! includes a 401 the gateway could not recover from; by the time the
//! caller sees it the session has already been cleared.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::errors::ApiError;
use super::traits::PlaylistBackend;
use super::types::{
    CreatePlaylistsRequest, CreatePlaylistsResponse, ErrorBody, GenerateRequest, GenerateResponse,
};
use crate::gateway::{ApiRequest, Gateway};
use crate::session::{Playlist, Track};

/// Backend endpoint paths.
pub mod paths {
    pub const PLAYLISTS: &str = "/playlists";
    pub const TRACKS: &str = "/tracks";
    pub const GENERATE: &str = "/generate";
    pub const CREATE_PLAYLISTS: &str = "/create-playlists";
}

/// HTTP implementation of the backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    gateway: Arc<Gateway>,
}

impl HttpBackend {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Issue one call and decode a successful JSON body.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let response = self.gateway.request(path, request).await?;
        let status = response.status();
        debug!(operation, status = status.as_u16(), "backend call finished");

        if !status.is_success() {
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        response.json().await.map_err(|e| ApiError::Decode {
            operation,
            message: e.to_string(),
        })
    }
}

/// Best-effort message from an error response.
async fn error_message(response: Response) -> String {
    let text = match response.text().await {
        Ok(text) => text,
        Err(_) => return "request failed".to_string(),
    };

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(body) => body.detail.to_string(),
        Err(_) if !text.trim().is_empty() && text.len() <= 200 => text.trim().to_string(),
        Err(_) => "request failed".to_string(),
    }
}

#[async_trait]
impl PlaylistBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        self.call("playlists", paths::PLAYLISTS, ApiRequest::get())
            .await
    }

    /// No ids, no call: an empty list is answered locally.
    async fn tracks(&self, playlist_ids: &[String]) -> Result<Vec<Track>, ApiError> {
        if playlist_ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = ApiRequest::get().query("playlist_ids", playlist_ids.join(","));
        self.call("tracks", paths::TRACKS, request).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        let request = ApiRequest::post().json(request)?;
        self.call("generate", paths::GENERATE, request).await
    }

    async fn create_playlists(
        &self,
        request: &CreatePlaylistsRequest,
    ) -> Result<CreatePlaylistsResponse, ApiError> {
        let request = ApiRequest::post().json(request)?;
        self.call("create-playlists", paths::CREATE_PLAYLISTS, request)
            .await
    }
}
