// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tactus — Braille recognition and encoding.
//
// Entry point. Initialises logging, parses the command line, and hands off to
// the subcommand; failures are printed in plain language.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tactus_core::human_errors::humanize_error;

#[derive(Parser)]
#[command(name = "tactus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read Braille from photos and scans, or write text as Braille", long_about = None)]
struct Cli {
    /// Pipeline configuration file (JSON)
    #[arg(long, global = true, env = "TACTUS_CONFIG")]
    config: Option<PathBuf>,

    /// Label table file (JSON); overrides the configuration
    #[arg(long, global = true, env = "TACTUS_LABELS")]
    labels: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognise Braille in one or more images
    ///
    /// Detections are read from `<image>.detections.json` next to each image.
    Recognize {
        /// Images to process
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Print full recognition results as JSON lines
        #[arg(long)]
        json: bool,

        /// Maximum images processed at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Encode text as Braille cells
    Encode {
        /// Text to encode
        #[arg(conflicts_with = "input")]
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        input: Option<PathBuf>,
    },
    /// List the label table
    Labels,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = commands::Settings {
        config: cli.config,
        labels: cli.labels,
    };

    let outcome = match cli.command {
        Commands::Recognize {
            images,
            json,
            concurrency,
        } => commands::recognize(&settings, images, json, concurrency).await,
        Commands::Encode { text, input } => commands::encode(&settings, text, input),
        Commands::Labels => commands::labels(&settings),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}
