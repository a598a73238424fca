//! cli::commands::logout

use anyhow::{Context as _, Result};
use tracing::info;

use crate::cli::context::Context;
use crate::cli::output;

/// Clear the session and remove stored credentials. Safe to repeat.
pub fn logout(ctx: &Context) -> Result<()> {
    let was_logged_in = ctx.session.is_authenticated();
    ctx.session.clear();
    ctx.vault
        .delete()
        .context("Failed to remove stored credentials")?;
    info!(was_logged_in, "logged out");

    if was_logged_in {
        output::print("Logged out.", ctx.verbosity);
    } else {
        output::print("Not logged in.", ctx.verbosity);
    }
    Ok(())
}
