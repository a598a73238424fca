//! review
//!
//! Turning generated groupings into playlists the user confirms.
//!
//! Every generated group becomes one [`ReviewEntry`], selected by default.
//! Entries are ordered genre, language, artist, and by name within a kind,
//! so indices are stable for a given result set.
//!
//! ```
//! use autoplaylist::review::ReviewSet;
//! use autoplaylist::session::GeneratedResults;
//!
//! let mut results = GeneratedResults::default();
//! results.genre.insert("Rock".into(), vec!["t1".into(), "t2".into()]);
//! results.artist.insert("Band".into(), vec!["t1".into()]);
//!
//! let mut review = ReviewSet::from_results(&results);
//! review.deselect_named("Band");
//!
//! let request = review.to_create_request();
//! assert_eq!(request.playlists.len(), 1);
//! assert_eq!(request.playlists[0].name, "Rock");
//! ```

use crate::api::{CreatePlaylistsRequest, PlaylistDraft};
use crate::session::{GeneratedResults, GeneratorKind, TrackDetails};

/// One proposed playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub name: String,
    pub track_ids: Vec<String>,
    pub kind: GeneratorKind,
    pub selected: bool,
}

/// Proposed playlists and their selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSet {
    entries: Vec<ReviewEntry>,
}

impl ReviewSet {
    pub fn from_results(results: &GeneratedResults) -> Self {
        let entries = GeneratorKind::ALL
            .into_iter()
            .flat_map(|kind| {
                results.groups(kind).iter().map(move |(name, ids)| ReviewEntry {
                    name: name.clone(),
                    track_ids: ids.clone(),
                    kind,
                    selected: true,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ReviewEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip the selection of entry `idx`. Returns the new state, or `None`
    /// if there is no such entry.
    pub fn toggle(&mut self, idx: usize) -> Option<bool> {
        let entry = self.entries.get_mut(idx)?;
        entry.selected = !entry.selected;
        Some(entry.selected)
    }

    /// Deselect every entry called `name` (ASCII case-insensitive).
    /// Returns how many entries changed.
    pub fn deselect_named(&mut self, name: &str) -> usize {
        let mut changed = 0;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.selected && e.name.eq_ignore_ascii_case(name))
        {
            entry.selected = false;
            changed += 1;
        }
        changed
    }

    pub fn selected(&self) -> impl Iterator<Item = &ReviewEntry> {
        self.entries.iter().filter(|e| e.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Entries with their indices, grouped by kind. Kinds without entries
    /// are omitted.
    pub fn grouped(&self) -> Vec<(GeneratorKind, Vec<(usize, &ReviewEntry)>)> {
        GeneratorKind::ALL
            .into_iter()
            .map(|kind| {
                let group: Vec<_> = self
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.kind == kind)
                    .collect();
                (kind, group)
            })
            .filter(|(_, group)| !group.is_empty())
            .collect()
    }

    /// Body for `/create-playlists` from the selected entries only.
    pub fn to_create_request(&self) -> CreatePlaylistsRequest {
        CreatePlaylistsRequest {
            playlists: self
                .selected()
                .map(|e| PlaylistDraft {
                    name: e.name.clone(),
                    track_ids: e.track_ids.clone(),
                })
                .collect(),
        }
    }
}

/// Display lines for up to `limit` tracks of an entry.
///
/// Ids without details are shown as-is.
pub fn track_preview(entry: &ReviewEntry, details: &TrackDetails, limit: usize) -> Vec<String> {
    entry
        .track_ids
        .iter()
        .take(limit)
        .map(|id| match details.get(id) {
            Some(d) if d.artists.is_empty() => d.name.clone(),
            Some(d) => format!("{} ({})", d.name, d.artists),
            None => id.clone(),
        })
        .collect()
}
