// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docuhash — tamper-evidence fingerprints for contracts
//
// Entry point. Initialises logging, parses the command line, and hands off to
// the command runner. Failures are reported once here; nothing is rolled back.

mod app;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use docuhash_core::human_errors::humanize_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match app::run(cli).await {
        Ok(app::Outcome::Success) => ExitCode::SUCCESS,
        Ok(app::Outcome::Mismatch) => ExitCode::from(2),
        Err(err) => {
            tracing::error!(error = %err, "docuhash failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}
