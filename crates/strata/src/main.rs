// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strata - tiered session memory for long conversations.
//!
//! This is the binary entry point. It replays recorded conversations through
//! the memory, inspects exported snapshots and prints the effective
//! configuration.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strata - tiered session memory for long conversations.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a JSON transcript and report what the memory retained.
    Replay {
        /// JSON array of turns (`user_text`, `response_text`, `entities`).
        transcript: PathBuf,
        /// Assemble a prompt for this query after ingesting.
        #[arg(long)]
        query: Option<String>,
        /// Number of past turns to retrieve (defaults to `retrieval.top_k`).
        #[arg(long)]
        top_k: Option<usize>,
        /// Write a snapshot of the final memory state to this path.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Load a snapshot and print its statistics.
    Inspect {
        /// Snapshot produced by `replay --export`.
        snapshot: PathBuf,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => strata_config::load_and_validate_path(path),
        None => strata_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            strata_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let result = match cli.command {
        Some(Commands::Replay {
            transcript,
            query,
            top_k,
            export,
        }) => {
            let options = commands::ReplayOptions {
                transcript,
                query,
                top_k,
                export,
            };
            commands::run_replay(&config, options).await
        }
        Some(Commands::Inspect { snapshot }) => commands::run_inspect(&config, &snapshot).await,
        Some(Commands::Config) => commands::run_config(&config),
        None => {
            println!("strata: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("strata: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber, honouring `RUST_LOG` when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strata={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
