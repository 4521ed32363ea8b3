//! CLI for webvault.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webvault_core::config;

use commands::{run_jobs, run_list};

/// Top-level CLI. With no arguments, runs the built-in job list.
#[derive(Debug, Parser)]
#[command(name = "webvault")]
#[command(about = "Fetch a fixed URL list concurrently and index the bodies in SQLite")]
pub struct Cli {
    /// Load jobs and paths from a TOML file instead of the built-in list.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log to ~/.local/state/webvault/webvault.log instead of stdout.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Fetch every configured URL and store the bodies (default).
    Run,

    /// Show the records stored in the database.
    List,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = config::load_or_default(self.config.as_deref())?;
        tracing::debug!("config: {:?}", cfg);

        match self.command.unwrap_or(CliCommand::Run) {
            CliCommand::Run => run_jobs(&cfg).await?,
            CliCommand::List => run_list(&cfg).await?,
        }

        Ok(())
    }
}
