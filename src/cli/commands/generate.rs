//! cli::commands::generate
//!
//! `ap generate`: select playlists, run the generators, review the result
//! and optionally create the selected playlists.

use anyhow::{bail, Result};

use crate::api::{self, PlaylistBackend};
use crate::cli::args::GenerateArgs;
use crate::cli::context::Context;
use crate::cli::output;
use crate::review::ReviewSet;
use crate::session::{GeneratorKind, SessionState, SettingsPatch};

pub fn generate(ctx: &Context, args: &GenerateArgs) -> Result<()> {
    ctx.require_login()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(generate_async(ctx, args))
}

async fn generate_async(ctx: &Context, args: &GenerateArgs) -> Result<()> {
    let backend = ctx.backend();
    apply_options(&ctx.session, args);

    let available = api::load_playlists(&backend, &ctx.session).await?;
    for id in &args.playlists {
        match available.iter().find(|p| &p.id == id) {
            Some(p) => ctx.session.select_playlist(p.clone()),
            None => bail!("unknown playlist '{}'; see 'ap playlists'", id),
        }
    }

    let response = api::generate_from_session(&backend, &ctx.session).await?;
    let mut review = ReviewSet::from_results(&response.results);
    if review.is_empty() {
        output::print(
            "No playlists were generated. Try different options.",
            ctx.verbosity,
        );
        return Ok(());
    }

    for name in &args.exclude {
        if review.deselect_named(name) == 0 {
            output::warn(format!("no generated playlist named '{}'", name), ctx.verbosity);
        }
    }

    if !ctx.quiet() {
        println!("{}", output::format_review(&review, &response.track_details));
        println!("{} of {} selected", review.selected_count(), review.len());
    }

    if args.create {
        create_selected(ctx, &backend, &review).await?;
    }
    Ok(())
}

async fn create_selected(
    ctx: &Context,
    backend: &dyn PlaylistBackend,
    review: &ReviewSet,
) -> Result<()> {
    let request = review.to_create_request();
    if request.playlists.is_empty() {
        output::print("Nothing selected; no playlists created.", ctx.verbosity);
        return Ok(());
    }

    let response = backend.create_playlists(&request).await?;
    for created in &response.created {
        if ctx.quiet() {
            println!("{}", created.playlist_id);
        } else {
            println!("Created '{}' ({} tracks)", created.name, created.track_count);
        }
    }
    Ok(())
}

/// Apply generator toggles and limits from the command line.
fn apply_options(session: &SessionState, args: &GenerateArgs) {
    let enabled = session.enabled_generators();
    for (kind, disable) in [
        (GeneratorKind::Genre, args.no_genre),
        (GeneratorKind::Language, args.no_language),
        (GeneratorKind::Artist, args.no_artist),
    ] {
        if disable && enabled.is_enabled(kind) {
            session.toggle_generator(kind);
        }
    }

    session.update_generator_settings(SettingsPatch {
        allow_duplicates: args.allow_duplicates.then_some(true),
        artist_min_appearances: args.artist_min,
        max_languages: args.max_languages,
        max_genres: args.max_genres,
        max_artists: args.max_artists,
    });
}
