//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Network commands are async; each handler builds a tokio runtime and
//! blocks on its async implementation, keeping dispatch synchronous.

mod completion;
mod generate;
mod login;
mod logout;
mod playlists;
mod status;

pub use completion::completion;
pub use generate::generate;
pub use login::login;
pub use logout::logout;
pub use playlists::playlists;
pub use status::status;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::context::Context;

/// Dispatch a command that needs a loaded [`Context`].
pub fn dispatch(command: &Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Login {
            callback,
            no_browser,
        } => login(ctx, callback.as_deref(), *no_browser),
        Command::Logout => logout(ctx),
        Command::Status => status(ctx),
        Command::Playlists => playlists(ctx),
        Command::Generate(args) => generate(ctx, args),
        Command::Completion { shell } => completion(*shell),
    }
}
