use std::io;

use anyhow::Context;
use draincleaner_core::config::ConfigManager;
use draincleaner_core::sync::{ConsoleReporter, SyncEngine};

use crate::cli::Cli;

pub struct SyncCommand;

impl SyncCommand {
    pub fn execute(cli: &Cli) -> anyhow::Result<()> {
        tracing::debug!(
            source = %cli.sourcepath.display(),
            target = %cli.targetpath.display(),
            dry_run = cli.dry_run,
            "starting sync"
        );

        let config = ConfigManager::load(cli.config.as_deref(), &cli.sourcepath)
            .context("Failed to load configuration")?;

        let engine = SyncEngine::new(config, cli.sync_options())
            .context("Failed to initialize sync engine")?;

        let mut reporter = ConsoleReporter::new(io::stdout().lock(), cli.verbose, cli.colored);
        let result = engine
            .sync(&cli.sourcepath, &cli.targetpath, &mut reporter)
            .context("Sync operation failed")?;

        if !result.is_success() {
            anyhow::bail!(
                "{} file(s) failed to sync:\n  {}",
                result.errors.len(),
                result.errors.join("\n  ")
            );
        }

        Ok(())
    }
}
