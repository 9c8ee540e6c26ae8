//! Main entry point.

use clap::Parser;
use gridboard_cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting Gridboard as {}", cli.user);

    let output = run(cli)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
