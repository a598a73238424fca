//! cli::commands::login
//!
//! `ap login`: open the backend's login page and read the callback URL.
//!
//! The callback URL carries both credentials, so it is read with echo
//! disabled and never printed.

use anyhow::{bail, Context as _, Result};
use tracing::debug;

use crate::auth::{self, Callback};
use crate::cli::context::Context;
use crate::cli::output;

pub fn login(ctx: &Context, callback: Option<&str>, no_browser: bool) -> Result<()> {
    let callback_url = match callback {
        Some(url) => url.to_string(),
        None => {
            let url = auth::login_url(ctx.config.base_url());
            if ctx.quiet() {
                bail!("--callback is required with --quiet");
            }
            output::print(format!("Log in at: {}", url), ctx.verbosity);
            if !no_browser {
                if let Err(e) = open::that(&url) {
                    debug!(error = %e, "could not open browser");
                    output::warn("could not open a browser; open the URL above", ctx.verbosity);
                }
            }
            rpassword::prompt_password("Paste the callback URL: ")
                .context("Failed to read callback URL")?
        }
    };

    match auth::complete_login(&ctx.session, &callback_url).context("Invalid callback URL")? {
        Callback::Authorized { refresh, .. } => {
            if refresh.is_none() {
                output::warn(
                    "no refresh credential issued; you will need to log in again when this session expires",
                    ctx.verbosity,
                );
            }
            output::print("Logged in.", ctx.verbosity);
            Ok(())
        }
        Callback::Rejected => bail!("login was not authorized; run 'ap login' again"),
    }
}
