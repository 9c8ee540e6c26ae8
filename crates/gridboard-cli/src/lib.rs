//! Gridboard command-line shell.
//!
//! Every invocation loads the stored dashboards, applies one command as the
//! given user and writes the result back.

mod cli;
mod render;
mod session;

pub use cli::{Cli, Command};
pub use render::render_workspace;
pub use session::Session;

use anyhow::{Context, Result};
use gridboard_core::Config;
use std::sync::Arc;

/// Run a parsed command line and return what to print.
pub fn run(cli: Cli) -> Result<String> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let storage = config.open_storage().context("Failed to open storage")?;
    log::debug!("Using storage in {}", storage.base_path().display());

    let mut session = Session::open(Arc::new(storage), &cli.user)?;
    let output = session.execute(cli.command)?;
    session.close()?;
    Ok(output)
}
