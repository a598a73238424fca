//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--debug`: debug logging on stderr
//! - `--quiet` / `-q`: minimal, machine-readable output
//! - `--base-url <URL>`: backend address, overriding the config file

use clap::{Args, Parser, Subcommand};

/// AutoPlaylist - generate Spotify playlists grouped by genre, language and artist
#[derive(Parser, Debug)]
#[command(name = "ap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in through the music service
    #[command(
        long_about = "Log in through the music service.\n\n\
            Opens the backend's login page in a browser. After you approve access, \
            the browser lands on a callback URL containing your credentials. Paste \
            that URL when prompted (input is hidden), or pass it with --callback.",
        after_help = "\
EXAMPLES:
    # Open the browser and paste the callback URL when prompted
    ap login

    # Headless machine: print the URL only
    ap login --no-browser

    # Non-interactive
    ap login --callback 'https://app.example.com/callback?token=...&refresh=...'"
    )]
    Login {
        /// Callback URL (or its query string) from the login redirect
        #[arg(long, value_name = "URL")]
        callback: Option<String>,

        /// Do not open a browser, only print the login URL
        #[arg(long)]
        no_browser: bool,
    },

    /// Forget stored credentials
    Logout,

    /// Show whether you are logged in
    Status,

    /// List your playlists
    Playlists,

    /// Generate grouped playlists from selected playlists
    #[command(after_help = "\
EXAMPLES:
    # Group two playlists by genre and artist, preview only
    ap generate --playlist liked --playlist 37i9dQZF1DX0XUsuxWHRQd --no-language

    # Create everything except one group
    ap generate --playlist liked --exclude 'Lo-Fi' --create")]
    Generate(GenerateArgs),

    /// Generate shell completion scripts
    #[command(after_help = "\
EXAMPLES:
    ap completion bash > ~/.local/share/bash-completion/completions/ap
    ap completion zsh > ~/.zfunc/_ap
    ap completion fish > ~/.config/fish/completions/ap.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments of `ap generate`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Playlist id to draw tracks from (repeatable; see `ap playlists`)
    #[arg(long = "playlist", value_name = "ID", required = true)]
    pub playlists: Vec<String>,

    /// Skip grouping by genre
    #[arg(long)]
    pub no_genre: bool,

    /// Skip grouping by language
    #[arg(long)]
    pub no_language: bool,

    /// Skip grouping by artist
    #[arg(long)]
    pub no_artist: bool,

    /// Let a track appear in more than one generated playlist
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Minimum tracks for an artist playlist (at least 3)
    #[arg(long, value_name = "N")]
    pub artist_min: Option<u32>,

    /// Maximum number of genre playlists
    #[arg(long, value_name = "N")]
    pub max_genres: Option<u32>,

    /// Maximum number of language playlists
    #[arg(long, value_name = "N")]
    pub max_languages: Option<u32>,

    /// Maximum number of artist playlists
    #[arg(long, value_name = "N")]
    pub max_artists: Option<u32>,

    /// Leave out a generated playlist by name (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Create the selected playlists on the music service
    #[arg(long)]
    pub create: bool,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
