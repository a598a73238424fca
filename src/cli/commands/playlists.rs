//! cli::commands::playlists

use anyhow::Result;

use crate::api;
use crate::cli::context::Context;
use crate::cli::output;

/// List the user's playlists.
///
/// Synchronous wrapper running the async implementation on a tokio runtime.
pub fn playlists(ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(playlists_async(ctx))
}

async fn playlists_async(ctx: &Context) -> Result<()> {
    let backend = ctx.backend();
    let playlists = api::load_playlists(&backend, &ctx.session).await?;

    if playlists.is_empty() {
        output::print("No playlists found.", ctx.verbosity);
        return Ok(());
    }

    if ctx.quiet() {
        for p in &playlists {
            println!("{}", p.id);
        }
    } else {
        println!("{}", output::format_playlists(&playlists));
    }
    Ok(())
}
