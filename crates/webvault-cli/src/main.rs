use clap::Parser;
use webvault_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    if cli.log_file {
        if let Err(err) = logging::init_logging_file() {
            logging::init_logging();
            tracing::warn!("log file unavailable, logging to stdout: {:#}", err);
        }
    } else {
        logging::init_logging();
    }

    if let Err(err) = cli.run().await {
        eprintln!("webvault error: {:#}", err);
        std::process::exit(1);
    }
}
