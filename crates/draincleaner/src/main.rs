mod cli;
mod commands;
mod logging;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cli::Cli;

fn main() -> anyhow::Result<()> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    // Bare invocation shows usage instead of a missing-argument error
    if std::env::args_os().len() <= 1 {
        Cli::command()
            .print_help()
            .context("Failed to print help")?;
        return Ok(());
    }

    let cli = Cli::parse();

    logging::init(cli.verbose)?;
    if cli.colored {
        colored::control::set_override(true);
    }

    commands::SyncCommand::execute(&cli).context("Failed to execute sync")?;

    Ok(())
}
