use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use treesync::commands::sync::{run, RunOutcome};
use treesync::config::Cli;
use treesync::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = treesync::logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli).context("Invalid arguments")?;

    match run(config).context("Sync failed")? {
        RunOutcome::Completed(_) => {}
        RunOutcome::Declined => println!("Exiting"),
    }

    Ok(())
}
