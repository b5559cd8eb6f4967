//! # Main — CLI Entry Point
//!
//! Reads one candidate, runs the AKS engine and prints the verdict. The
//! candidate comes from the positional argument or, when omitted, from a
//! prompt on stdin. Accepts plain integers and expressions such as
//! `269*277` or `2^61 - 1`.
//!
//! ## Options
//!
//! - `--config` / `AKS_CONFIG`: TOML engine configuration.
//! - `--threads`: Rayon thread pool size (defaults to all cores).
//! - `--sequential`: check step-5 witnesses on one thread.
//! - `--r-limit`: cap on the r search.
//! - `--json`: print the full run report as JSON.

mod cli;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "aks", about = "Deterministic AKS primality test")]
struct Cli {
    /// Integer to test (e.g. 74513, 269*277, 2^61-1). Prompts on stdin if omitted.
    #[arg(allow_hyphen_values = true)]
    n: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, env = "AKS_CONFIG")]
    config: Option<PathBuf>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Check polynomial witnesses sequentially instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Upper bound on the modulus r searched in step 2
    #[arg(long)]
    r_limit: Option<u64>,

    /// Print the full report as JSON instead of the bare verdict
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for machine-readable logs, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::run(&cli)
}
