//! session::types
//!
//! Data carried in the session alongside the credentials.
//!
//! These types double as the backend's wire format, so field names follow
//! the JSON the generation service speaks (`track_count`, `type`, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum allowed value for [`GeneratorSettings::artist_min_appearances`].
pub const MIN_ARTIST_APPEARANCES: u32 = 3;

/// Whether a playlist is the user's liked-songs collection or a real playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    Liked,
    Playlist,
}

/// A source playlist on the music service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist id (`"liked"` for liked songs)
    pub id: String,
    /// Display name
    pub name: String,
    /// Number of tracks
    pub track_count: u64,
    /// Liked songs or regular playlist
    #[serde(rename = "type")]
    pub kind: PlaylistKind,
}

/// Artist reference on a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// A track as returned by `/tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: String,
    pub release_date: String,
    #[serde(default)]
    pub playlist_source: Option<String>,
}

/// Grouping strategies the backend can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Genre,
    Language,
    Artist,
}

impl GeneratorKind {
    /// All kinds in review order.
    pub const ALL: [GeneratorKind; 3] = [
        GeneratorKind::Genre,
        GeneratorKind::Language,
        GeneratorKind::Artist,
    ];

    /// Heading used when listing results of this kind.
    pub fn label(self) -> &'static str {
        match self {
            GeneratorKind::Genre => "By Genre",
            GeneratorKind::Language => "By Language",
            GeneratorKind::Artist => "By Artist",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeneratorKind::Genre => "genre",
            GeneratorKind::Language => "language",
            GeneratorKind::Artist => "artist",
        })
    }
}

/// Which generators are enabled for the next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledGenerators {
    pub genre: bool,
    pub language: bool,
    pub artist: bool,
}

impl Default for EnabledGenerators {
    fn default() -> Self {
        Self {
            genre: true,
            language: true,
            artist: true,
        }
    }
}

impl EnabledGenerators {
    /// Check whether a generator is enabled.
    pub fn is_enabled(&self, kind: GeneratorKind) -> bool {
        match kind {
            GeneratorKind::Genre => self.genre,
            GeneratorKind::Language => self.language,
            GeneratorKind::Artist => self.artist,
        }
    }

    /// Flip a single generator.
    pub fn toggle(&mut self, kind: GeneratorKind) {
        let flag = match kind {
            GeneratorKind::Genre => &mut self.genre,
            GeneratorKind::Language => &mut self.language,
            GeneratorKind::Artist => &mut self.artist,
        };
        *flag = !*flag;
    }

    /// True if at least one generator is enabled.
    pub fn any(&self) -> bool {
        self.genre || self.language || self.artist
    }
}

/// Limits and flags passed to the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Allow a track to appear in more than one generated playlist
    pub allow_duplicates: bool,
    /// Minimum number of tracks an artist needs for their own playlist
    pub artist_min_appearances: u32,
    pub max_languages: u32,
    pub max_genres: u32,
    pub max_artists: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            allow_duplicates: false,
            artist_min_appearances: 5,
            max_languages: 3,
            max_genres: 3,
            max_artists: 5,
        }
    }
}

impl GeneratorSettings {
    /// Merge a partial update. Fields left as `None` are kept.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.allow_duplicates {
            self.allow_duplicates = v;
        }
        if let Some(v) = patch.artist_min_appearances {
            self.artist_min_appearances = v.max(MIN_ARTIST_APPEARANCES);
        }
        if let Some(v) = patch.max_languages {
            self.max_languages = v;
        }
        if let Some(v) = patch.max_genres {
            self.max_genres = v;
        }
        if let Some(v) = patch.max_artists {
            self.max_artists = v;
        }
    }
}

/// Partial update for [`GeneratorSettings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPatch {
    pub allow_duplicates: Option<bool>,
    pub artist_min_appearances: Option<u32>,
    pub max_languages: Option<u32>,
    pub max_genres: Option<u32>,
    pub max_artists: Option<u32>,
}

/// Generated groupings: group name to track ids, per generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedResults {
    #[serde(default)]
    pub genre: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub language: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub artist: BTreeMap<String, Vec<String>>,
}

impl GeneratedResults {
    /// Groups produced by one generator.
    pub fn groups(&self, kind: GeneratorKind) -> &BTreeMap<String, Vec<String>> {
        match kind {
            GeneratorKind::Genre => &self.genre,
            GeneratorKind::Language => &self.language,
            GeneratorKind::Artist => &self.artist,
        }
    }

    /// Total number of groups across all generators.
    pub fn len(&self) -> usize {
        self.genre.len() + self.language.len() + self.artist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Display info for a track id in generated results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDetail {
    pub name: String,
    /// Comma-separated artist names
    pub artists: String,
}

/// Track id to display info.
pub type TrackDetails = BTreeMap<String, TrackDetail>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_kind_uses_type_field() {
        let json = r#"{"id":"liked","name":"Liked Songs","track_count":12,"type":"liked"}"#;
        let p: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(p.kind, PlaylistKind::Liked);
        assert_eq!(p.track_count, 12);

        let back = serde_json::to_value(&p).unwrap();
        assert_eq!(back["type"], "liked");
    }

    #[test]
    fn settings_defaults() {
        let s = GeneratorSettings::default();
        assert!(!s.allow_duplicates);
        assert_eq!(s.artist_min_appearances, 5);
        assert_eq!(s.max_languages, 3);
        assert_eq!(s.max_genres, 3);
        assert_eq!(s.max_artists, 5);
    }

    #[test]
    fn settings_patch_keeps_unset_fields() {
        let mut s = GeneratorSettings::default();
        s.apply(SettingsPatch {
            max_genres: Some(7),
            ..Default::default()
        });
        assert_eq!(s.max_genres, 7);
        assert_eq!(s.max_artists, 5);
    }

    #[test]
    fn artist_minimum_is_clamped() {
        let mut s = GeneratorSettings::default();
        s.apply(SettingsPatch {
            artist_min_appearances: Some(1),
            ..Default::default()
        });
        assert_eq!(s.artist_min_appearances, MIN_ARTIST_APPEARANCES);
    }

    #[test]
    fn toggle_generator_flips_one_flag() {
        let mut g = EnabledGenerators::default();
        g.toggle(GeneratorKind::Language);
        assert!(g.genre);
        assert!(!g.language);
        assert!(g.artist);
        g.toggle(GeneratorKind::Language);
        assert!(g.language);
    }

    #[test]
    fn results_tolerate_missing_kinds() {
        let r: GeneratedResults = serde_json::from_str(r#"{"genre":{"Rock":["a","b"]}}"#).unwrap();
        assert_eq!(r.len(), 1);
        assert!(r.artist.is_empty());
    }
}
