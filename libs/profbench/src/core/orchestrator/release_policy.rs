// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// When the orchestrator writes the release sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Sleep unconditionally, then release.
    FixedDelay(Duration),
    /// Release once `path` exists, or when `timeout` runs out.
    ReadyFile { path: PathBuf, timeout: Duration },
}

/// How the release wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Elapsed,
    Ready,
    TimedOut,
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseOutcome::Elapsed => write!(f, "after the grace period"),
            ReleaseOutcome::Ready => write!(f, "when the profiler reported ready"),
            ReleaseOutcome::TimedOut => write!(f, "after the ready-file timeout"),
        }
    }
}

impl ReleasePolicy {
    /// Block until the target may be released. Never fails; a ready file
    /// that never appears degrades to the fixed delay.
    pub fn await_release(&self) -> ReleaseOutcome {
        match self {
            ReleasePolicy::FixedDelay(delay) => {
                tracing::info!("Sleeping {:?} while the profiler attaches", delay);
                std::thread::sleep(*delay);
                ReleaseOutcome::Elapsed
            }
            ReleasePolicy::ReadyFile { path, timeout } => {
                tracing::info!(
                    "Waiting up to {:?} for profiler ready file {}",
                    timeout,
                    path.display()
                );
                let start = Instant::now();

                loop {
                    if path.exists() {
                        tracing::info!(
                            "Profiler ready after {:?}",
                            start.elapsed()
                        );
                        return ReleaseOutcome::Ready;
                    }
                    if start.elapsed() >= *timeout {
                        tracing::warn!(
                            "Ready file {} did not appear within {:?}, releasing anyway",
                            path.display(),
                            timeout
                        );
                        return ReleaseOutcome::TimedOut;
                    }
                    std::thread::sleep(READY_POLL_INTERVAL);
                }
            }
        }
    }
}
