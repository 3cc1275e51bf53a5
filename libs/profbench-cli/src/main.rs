// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! profbench CLI
//!
//! Runs a target command under a profiler that is started with the target's
//! PID and given time to attach before the target is released.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use profbench::core::describe_status;
use profbench::{BenchConfig, Orchestrator, RunReport};

#[derive(Parser, Debug)]
#[command(name = "profbench")]
#[command(author, version, about = "Run a workload under a profiler that attaches first", long_about = None)]
#[command(
    after_help = "Commands are split on single spaces and exec'd directly; quoting is not supported.\n\
                  Example: profbench \"./workload --iters 100\" \"bpftrace trace.bt\" \"--pid=\""
)]
struct Cli {
    /// Target command to benchmark
    #[arg(value_name = "TARGET_COMMAND")]
    target: String,

    /// Profiler command; the target PID is appended as the last argument
    #[arg(value_name = "PROFILER_COMMAND")]
    profiler: String,

    /// Prefix placed directly before the PID (e.g. "--pid=" or "-p ")
    #[arg(value_name = "PID_FLAG", allow_hyphen_values = true)]
    pid_flag: Option<String>,

    /// Config file (TOML). Defaults to $PROFBENCH_CONFIG when set
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Milliseconds to wait for the profiler before releasing the target (default: 5000)
    #[arg(long, value_name = "MS")]
    grace_period_ms: Option<u64>,

    /// Release the target as soon as this file exists (grace period becomes the timeout)
    #[arg(long, value_name = "PATH")]
    ready_file: Option<PathBuf>,

    /// Signal sent to the profiler after the target exits (default: SIGINT)
    #[arg(long, value_name = "SIGNAL")]
    stop_signal: Option<String>,

    /// Kill and reap already-spawned children if the run aborts
    #[arg(long)]
    cleanup_on_abort: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    init_tracing();

    match run(cli) {
        Ok(report) => {
            log_summary(&report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn run(cli: Cli) -> Result<RunReport> {
    let config = resolve_config(&cli)?;

    let orchestrator = Orchestrator::new(
        &cli.target,
        &cli.profiler,
        cli.pid_flag.as_deref().unwrap_or(""),
        &config,
    )
    .context("Invalid arguments")?;

    orchestrator.run().context("Benchmark run failed")
}

/// Config file first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<BenchConfig> {
    let mut config =
        BenchConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(ms) = cli.grace_period_ms {
        config.grace_period_ms = ms;
    }
    if let Some(path) = &cli.ready_file {
        config.ready_file = Some(path.clone());
    }
    if let Some(signal) = &cli.stop_signal {
        config.stop_signal = signal.clone();
    }
    if cli.cleanup_on_abort {
        config.cleanup_on_abort = true;
    }

    tracing::debug!("Effective config: {:?}", config);
    Ok(config)
}

fn log_summary(report: &RunReport) {
    tracing::info!(
        "Run complete: target released {}; target (PID {}) {}, profiler (PID {}) {}{}",
        report.release,
        report.target_pid,
        describe_status(&report.target_status),
        report.profiler_pid,
        describe_status(&report.profiler_status),
        if report.profiler_signalled {
            ""
        } else {
            " on its own"
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("profbench").chain(args.iter().copied()))
    }

    #[test]
    fn test_two_and_three_positionals_accepted() {
        let cli = parse(&["./work", "perf record"]).unwrap();
        assert_eq!(cli.pid_flag, None);

        let cli = parse(&["./work", "perf record", "--pid="]).unwrap();
        assert_eq!(cli.pid_flag.as_deref(), Some("--pid="));
    }

    #[test]
    fn test_wrong_positional_count_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["./work"]).is_err());
        assert!(parse(&["a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let cli = parse(&[
            "--grace-period-ms",
            "20",
            "--stop-signal",
            "SIGTERM",
            "--cleanup-on-abort",
            "--config",
            "/nonexistent/profbench.toml",
            "a",
            "b",
        ])
        .unwrap();
        assert!(resolve_config(&cli).is_err());

        let cli = parse(&["--grace-period-ms", "20", "--cleanup-on-abort", "a", "b"]).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.grace_period_ms, 20);
        assert!(config.cleanup_on_abort);
    }
}
