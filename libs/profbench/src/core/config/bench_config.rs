// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Run configuration via an optional `profbench.toml`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use nix::sys::signal::Signal;
use serde::Deserialize;

use crate::core::orchestrator::ReleasePolicy;
use crate::core::{BenchError, Result};

/// Settings that shape a run. Every field has a default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Delay between spawning the profiler and releasing the target. Doubles
    /// as the timeout when `ready_file` is set.
    pub grace_period_ms: u64,

    /// Release the target as soon as this path exists.
    pub ready_file: Option<PathBuf>,

    /// Signal sent to the profiler once the target has exited.
    pub stop_signal: String,

    /// SIGKILL and reap spawned children when the run aborts.
    pub cleanup_on_abort: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: Self::DEFAULT_GRACE_PERIOD_MS,
            ready_file: None,
            stop_signal: "SIGINT".to_string(),
            cleanup_on_abort: false,
        }
    }
}

impl BenchConfig {
    pub const DEFAULT_GRACE_PERIOD_MS: u64 = 5000;

    /// Environment variable naming a config file when `--config` is absent.
    pub const ENV_VAR: &'static str = "PROFBENCH_CONFIG";

    /// Load configuration from a TOML file. Missing or unparseable files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BenchError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            BenchError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file: explicit path, then `PROFBENCH_CONFIG`, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_from(explicit, std::env::var_os(Self::ENV_VAR))
    }

    fn resolve_from(explicit: Option<&Path>, env_path: Option<OsString>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match env_path.filter(|value| !value.is_empty()) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                tracing::debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn release_policy(&self) -> ReleasePolicy {
        match &self.ready_file {
            Some(path) => ReleasePolicy::ReadyFile {
                path: path.clone(),
                timeout: self.grace_period(),
            },
            None => ReleasePolicy::FixedDelay(self.grace_period()),
        }
    }

    /// Parse `stop_signal`. Accepts `SIGINT` as well as `INT`.
    pub fn stop_signal(&self) -> Result<Signal> {
        let name = self.stop_signal.trim().to_ascii_uppercase();
        let name = if name.starts_with("SIG") {
            name
        } else {
            format!("SIG{}", name)
        };

        Signal::from_str(&name).map_err(|_| {
            BenchError::Configuration(format!("Unknown stop signal '{}'", self.stop_signal))
        })
    }
}
