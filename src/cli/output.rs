//! cli::output
//!
//! User-facing output. Results go to stdout, diagnostics to stderr, and
//! everything except errors respects `--quiet`.

use std::fmt::Display;

use crate::review::{track_preview, ReviewSet};
use crate::session::{Playlist, PlaylistKind, TrackDetails};

/// Tracks shown under each generated playlist.
const PREVIEW_TRACKS: usize = 3;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    pub fn is_quiet(self) -> bool {
        self == Verbosity::Quiet
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if !verbosity.is_quiet() {
        eprintln!("warning: {}", message);
    }
}

/// One line per playlist: id, name, track count.
pub fn format_playlists(playlists: &[Playlist]) -> String {
    let width = playlists.iter().map(|p| p.id.len()).max().unwrap_or(0);
    playlists
        .iter()
        .map(|p| {
            let marker = match p.kind {
                PlaylistKind::Liked => " *",
                PlaylistKind::Playlist => "",
            };
            format!(
                "{:width$}  {}{} ({} tracks)",
                p.id,
                p.name,
                marker,
                p.track_count,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Review listing grouped by kind, with a short track preview per entry.
pub fn format_review(review: &ReviewSet, details: &TrackDetails) -> String {
    let mut out = Vec::new();
    for (kind, entries) in review.grouped() {
        out.push(kind.label().to_string());
        for (idx, entry) in entries {
            let mark = if entry.selected { 'x' } else { ' ' };
            out.push(format!(
                "  [{}] {:>2}. {} ({} tracks)",
                mark,
                idx + 1,
                entry.name,
                entry.track_ids.len()
            ));
            for line in track_preview(entry, details, PREVIEW_TRACKS) {
                out.push(format!("         {}", line));
            }
        }
    }
    out.join("\n")
}
