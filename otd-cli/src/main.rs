mod cli;
mod cli_modes;
mod indicator;
mod logging;
mod note;
mod render;

use anyhow::Result;
use clap::CommandFactory;
use cli::{Cli, Command};
use cli_modes::{diet_mode, placeholder_mode, years_mode};
use otd_core::Otd;
use render::{RenderOptions, Renderer, use_color};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("otd: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::new();
    logging::init_tracing(cli.verbose, cli.log_level.as_deref())?;

    let otd = Otd::new()?;
    debug!(
        journal_dir = %otd.config.journal_dir.display(),
        date_format = %otd.config.date_format,
        "loaded config"
    );
    let renderer = Renderer::new(Some(RenderOptions {
        use_color: use_color(cli.color),
    }));

    if cli.path {
        renderer.print_info(&format!("{}", otd.config.journal_dir.display()));
        return Ok(());
    }

    let api_key = cli.api_key.as_deref();
    match &cli.command {
        Some(Command::Years { file, dry_run, raw }) => {
            years_mode(&otd, &renderer, api_key, file, *dry_run, *raw).await
        }
        Some(Command::Diet { file, dry_run }) => {
            diet_mode(&otd, &renderer, api_key, file, *dry_run).await
        }
        Some(Command::Placeholder { file, diet }) => {
            placeholder_mode(&otd, &renderer, file, *diet)
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
