//! Tally CLI

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::error;

use crate::cli::Cli;

mod cli;
mod observability;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        eprintln!("Failed to initialise logging: {error}");
        return ExitCode::FAILURE;
    }

    match cli::run(&cli, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "tally failed");
            ExitCode::FAILURE
        }
    }
}

