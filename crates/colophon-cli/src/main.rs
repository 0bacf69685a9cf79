// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colophon — extract book metadata from cover and title-page photos.
//
// Entry point. Initialises logging, resolves the pipeline configuration,
// processes every image given on the command line, and prints one JSON result
// per file to stdout.

mod batch;
mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colophon_core::error::Result;
use colophon_extract::MetadataExtractor;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the JSON results.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "colophon failed");
            eprintln!("colophon: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.pipeline_config()?;
    tracing::info!(images = cli.images.len(), "Colophon starting");

    let extractor = Arc::new(MetadataExtractor::new(config)?);
    let results = batch::extract_paths(extractor, cli.images.clone()).await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{json}");
    Ok(())
}
