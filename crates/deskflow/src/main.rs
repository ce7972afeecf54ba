// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deskflow - operator tooling for the helpdesk workflow engine.
//!
//! This is the binary entry point. The workflow engine itself is a library
//! embedded by the transport layer; this binary covers the operational
//! chores around it.

mod admin;
mod mail;
mod training;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

/// Deskflow - helpdesk ticket workflow tooling.
#[derive(Parser, Debug)]
#[command(name = "deskflow", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective configuration with secrets redacted.
    Config,
    /// Create or upgrade the ticket database.
    Migrate,
    /// Classify a ticket description with the configured service.
    Classify {
        /// Description text to classify.
        text: String,
    },
    /// Retrain the classifier from a JSON file of labelled examples.
    Train {
        /// JSON array of `{"description": ..., "label": ...}` objects.
        #[arg(long)]
        examples: PathBuf,
    },
    /// Send a test email through the configured SMTP relay.
    SendTestEmail {
        /// Recipient address.
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => deskflow_config::load_and_validate_path(path),
        None => deskflow_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            deskflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Config => admin::print_config(&config),
        Commands::Migrate => admin::migrate(&config).await,
        Commands::Classify { text } => training::classify(&config, &text).await,
        Commands::Train { examples } => training::train(&config, examples).await,
        Commands::SendTestEmail { to } => mail::send_test_email(&config, &to).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("deskflow: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber with an env filter.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deskflow={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
