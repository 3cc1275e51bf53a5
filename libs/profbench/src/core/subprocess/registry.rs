// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use nix::unistd::Pid;

use super::{ProcessHandle, describe_status};

/// Children spawned during a run that have not been reaped yet.
///
/// Only consulted on the abort path, when cleanup is enabled.
#[derive(Debug, Default)]
pub struct ChildRegistry {
    live: Vec<ProcessHandle>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, handle: ProcessHandle) {
        self.live.push(handle);
    }

    /// Forget a child whose exit status has been collected.
    pub fn mark_reaped(&mut self, pid: Pid) {
        self.live.retain(|handle| handle.pid() != pid);
    }

    pub fn live(&self) -> &[ProcessHandle] {
        &self.live
    }

    /// Best effort: SIGKILL and reap every tracked child. Failures are logged.
    pub fn abort_all(&mut self) {
        for handle in self.live.drain(..) {
            if let Err(e) = handle.kill() {
                tracing::warn!("Failed to kill {} (PID {}): {}", handle.role(), handle.pid(), e);
                continue;
            }
            match handle.wait() {
                Ok(status) => tracing::info!(
                    "Reaped {} (PID {}): {}",
                    handle.role(),
                    handle.pid(),
                    describe_status(&status)
                ),
                Err(e) => tracing::warn!(
                    "Failed to reap {} (PID {}): {}",
                    handle.role(),
                    handle.pid(),
                    e
                ),
            }
        }
    }
}
