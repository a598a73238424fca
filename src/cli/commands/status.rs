//! cli::commands::status
//!
//! Reports login state from stored credentials only; no network call is
//! made and no part of a credential is printed.

use anyhow::Result;

use crate::cli::context::Context;

pub fn status(ctx: &Context) -> Result<()> {
    let authenticated = ctx.session.is_authenticated();

    if ctx.quiet() {
        // Machine-readable output
        println!(
            "{}",
            if authenticated {
                "authenticated"
            } else {
                "not_authenticated"
            }
        );
        return Ok(());
    }

    if authenticated {
        println!("Logged in to {}.", ctx.config.base_url());
        if ctx.session.refresh_token().is_none() {
            println!("No refresh credential stored; the session ends when the access credential expires.");
        }
    } else {
        println!("Not logged in to {}.", ctx.config.base_url());
        println!("Run 'ap login' to log in.");
    }
    if let Some(path) = ctx.config.path() {
        println!("Config: {}", path.display());
    }
    Ok(())
}
