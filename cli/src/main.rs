//! CLI for fork-sync.
//!
//! Mirrors unmerged community commits into enterprise forks as pull requests.

use clap::Parser;
use fork_sync::{RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// fork-sync - Replay community commits into enterprise forks as pull requests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the repository pair configuration.
    #[arg(long, default_value = "repos.toml")]
    config: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Chat-bot webhook for run summaries. Summaries are logged when unset.
    #[arg(long, env = "NOTIFY_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// List unmerged commits without cloning, pushing or creating PRs.
    #[arg(long)]
    dry_run: bool,

    /// Exit with status 1 when any migration or pair failed.
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // Octocrab and reqwest share one rustls provider.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();
    let strict = args.strict;

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if strict && summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Sets up compact log output filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.config, args.token)
        .with_webhook_url(args.webhook_url)
        .with_dry_run(args.dry_run);
    let runner = Runner::new(config)?;
    Ok(runner.run().await)
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Repository pairs: {}", summary.pairs.len());
    println!("  Unmerged commits: {}", summary.unmerged());

    if !summary.dry_run {
        println!("  Merged: {}", summary.merged());
        println!("  Failed: {}", summary.failed());
        println!("  Pairs with errors: {}", summary.pair_errors());
    }

    for pair in summary.pairs.iter().filter(|p| p.has_failures()) {
        if let Some(error) = &pair.error {
            println!("  [{}] error: {error}", pair.name);
        }
        for failure in &pair.failures {
            println!(
                "  [{}] {} failed: {}",
                pair.name,
                failure.source_sha,
                failure.reason.as_deref().unwrap_or("unknown reason")
            );
        }
    }
}
