//! AutoPlaylist client
//!
//! Client core for the AutoPlaylist service, which groups a user's Spotify
//! tracks into new playlists by genre, language and artist.
//!
//! # Architecture
//!
//! - [`session`] - Credential pair and session-scoped data, one shared handle
//! - [`gateway`] - Every backend call: bearer auth, one refresh, one retry
//! - [`api`] - Typed backend operations over the gateway
//! - [`auth`] - Delegated login callback and credential persistence
//! - [`review`] - Confirming generated playlists before creation
//! - [`secrets`] - Secret storage abstraction
//! - [`config`] - Configuration file discovery and precedence
//! - [`cli`] - The `ap` command-line client
//!
//! # Invariants
//!
//! 1. No invocation issues more than one refresh or more than one retry
//! 2. A failed refresh always leaves the session empty and notifies the host
//! 3. Credentials never appear in logs, errors or `Debug` output

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod gateway;
pub mod review;
pub mod secrets;
pub mod session;
