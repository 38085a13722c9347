use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::render::ColorMode;

/// otd — what you wrote on this day in other years
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Prints the daily notes folder
    #[arg(long, short)]
    pub path: bool,
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,
    /// Log what otd is doing to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Log filter, e.g. `debug` or `otd_core=trace`. Takes precedence over `--verbose`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// Summarizer API key. Overrides `api_key` from the config file.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize this day in earlier years into a daily note
    /// (e.g. `otd years "daily/February 6, 2025.md"`).
    Years {
        /// The daily note; its file name must be a date.
        file: PathBuf,
        /// Print the block instead of writing it.
        #[arg(long)]
        dry_run: bool,
        /// Use the notes' own text instead of asking the summarizer.
        #[arg(long)]
        raw: bool,
    },
    /// Estimate calories and macros from the note's food section.
    Diet {
        file: PathBuf,
        /// Print the block instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Append the placeholder the next block will replace.
    Placeholder {
        file: PathBuf,
        /// Use the diet estimate placeholder.
        #[arg(long)]
        diet: bool,
    },
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }
}
