//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: configuration
//! merging, rayon setup, candidate input and verdict output.

use anyhow::{Context, Result};
use aks::parse::parse_candidate;
use aks::{Aks, AksConfig};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use super::Cli;

/// Run one primality test as described by the command line.
pub fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    configure_rayon(config.threads);

    let input = match &cli.n {
        Some(expr) => expr.clone(),
        None => prompt_for_candidate()?,
    };
    let n = parse_candidate(&input)?;
    info!(
        bits = n.significant_bits(),
        cores = rayon::current_num_threads(),
        parallel = config.parallel,
        "aks starting"
    );

    let report = Aks::new(config).run(&n)?;
    info!(
        verdict = %report.verdict,
        step = %report.decided_by,
        elapsed_ms = report.elapsed_ms,
        "aks finished"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", report.verdict)?;
    }
    Ok(())
}

/// Config file (if any) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<AksConfig> {
    let mut config = match &cli.config {
        Some(path) => AksConfig::load(path)?,
        None => AksConfig::default(),
    };
    if let Some(threads) = cli.threads {
        config.threads = Some(threads);
    }
    if cli.sequential {
        config.parallel = false;
    }
    if let Some(limit) = cli.r_limit {
        config.r_search_limit = Some(limit);
    }
    config.validate()?;
    Ok(config)
}

/// Prompt on stdout and read one line from stdin.
fn prompt_for_candidate() -> Result<String> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Enter a number greater than 1")?;
    write!(out, ">> ")?;
    out.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read candidate from stdin")?;
    Ok(line)
}

/// Configure the global rayon thread pool.
pub fn configure_rayon(threads: Option<usize>) {
    let Some(num_threads) = threads else {
        return;
    };
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        warn!(error = %e, "Could not configure rayon thread pool");
    }
}
