// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Top-level control loop for one benchmark run.

use std::time::{SystemTime, UNIX_EPOCH};

use nix::sys::signal::Signal;
use nix::sys::wait::{WaitStatus, wait};
use nix::unistd::Pid;

use super::{ReapState, ReleaseOutcome, ReleasePolicy, RunState};
use crate::core::command::{CommandLine, DEFAULT_DELIMITER};
use crate::core::config::BenchConfig;
use crate::core::rendezvous::RendezvousChannel;
use crate::core::subprocess::launcher::{run_profiler_child, run_target_child};
use crate::core::subprocess::{
    ChildRegistry, ChildRole, Forked, ProcessHandle, describe_status,
};
use crate::core::{BenchError, Result};

/// What a completed run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub target_pid: Pid,
    pub profiler_pid: Pid,
    pub target_status: WaitStatus,
    pub profiler_status: WaitStatus,
    /// How the release wait ended.
    pub release: ReleaseOutcome,
    /// Taken immediately before the sentinel was written.
    pub released_at: SystemTime,
    /// Whether the stop signal was sent.
    ///
    /// False when the profiler was found already exited once the target was
    /// reaped. A profiler that exits between that check and the signal still
    /// counts as signalled.
    pub profiler_signalled: bool,
}

struct ReapOutcome {
    target_status: WaitStatus,
    profiler_status: WaitStatus,
    profiler_signalled: bool,
}

/// Spawns the target and the profiler, releases the target, reaps both.
///
/// Must run on a single-threaded process: it forks.
pub struct Orchestrator {
    target: CommandLine,
    profiler_template: String,
    pid_flag: String,
    release: ReleasePolicy,
    stop_signal: Signal,
    cleanup_on_abort: bool,
    state: RunState,
    registry: ChildRegistry,
}

impl Orchestrator {
    /// Validate both commands and the configuration. Nothing is spawned here.
    pub fn new(
        target_command: &str,
        profiler_command: &str,
        pid_flag: &str,
        config: &BenchConfig,
    ) -> Result<Self> {
        let target = CommandLine::parse(target_command, DEFAULT_DELIMITER)
            .map_err(|e| BenchError::Usage(format!("target command: {}", e)))?;
        CommandLine::parse(profiler_command, DEFAULT_DELIMITER)
            .map_err(|e| BenchError::Usage(format!("profiler command: {}", e)))?;

        Ok(Self {
            target,
            profiler_template: profiler_command.to_string(),
            pid_flag: pid_flag.to_string(),
            release: config.release_policy(),
            stop_signal: config.stop_signal()?,
            cleanup_on_abort: config.cleanup_on_abort,
            state: RunState::Init,
            registry: ChildRegistry::new(),
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run to completion.
    ///
    /// Any parent-side system call failure aborts the run. Children already
    /// spawned are left alone unless `cleanup_on_abort` is set.
    pub fn run(mut self) -> Result<RunReport> {
        match self.drive() {
            Ok(report) => Ok(report),
            Err(err) => {
                tracing::error!("Run aborted in state {}: {}", self.state, err);
                self.transition(RunState::Aborted);
                if self.cleanup_on_abort {
                    self.registry.abort_all();
                } else if !self.registry.live().is_empty() {
                    tracing::warn!(
                        "Leaving {} child process(es) running",
                        self.registry.live().len()
                    );
                }
                Err(err)
            }
        }
    }

    fn drive(&mut self) -> Result<RunReport> {
        let (sender, receiver) = RendezvousChannel::create()?;

        let target = match ProcessHandle::fork(ChildRole::Target)? {
            Forked::Parent(handle) => handle,
            Forked::Child => run_target_child(&self.target, sender, receiver),
        };
        self.registry.track(target);
        self.transition(RunState::TargetSpawned);

        let profiler = match ProcessHandle::fork(ChildRole::Profiler)? {
            Forked::Parent(handle) => handle,
            Forked::Child => run_profiler_child(
                &self.profiler_template,
                target.pid(),
                &self.pid_flag,
                sender,
                receiver,
            ),
        };
        self.registry.track(profiler);
        receiver.close()?;
        self.transition(RunState::ProfilerSpawned);

        let release = self.release.await_release();
        let released_at = SystemTime::now();
        sender.signal()?;
        tracing::info!(
            "Released target (PID {}) {} at unix_ms={}",
            target.pid(),
            release,
            unix_millis(released_at)
        );
        self.transition(RunState::Released);

        let outcome = self.reap(target, profiler)?;
        self.transition(RunState::Done);

        Ok(RunReport {
            target_pid: target.pid(),
            profiler_pid: profiler.pid(),
            target_status: outcome.target_status,
            profiler_status: outcome.profiler_status,
            release,
            released_at,
            profiler_signalled: outcome.profiler_signalled,
        })
    }

    fn reap(&mut self, target: ProcessHandle, profiler: ProcessHandle) -> Result<ReapOutcome> {
        self.transition(RunState::Reaping);

        let mut state = ReapState::NeitherDone;
        let mut profiler_signalled = false;

        let (target_status, profiler_status) = loop {
            if let Some(statuses) = state.completed() {
                break statuses;
            }

            let status = wait().map_err(|e| BenchError::system_call("wait", e))?;

            match status.pid() {
                Some(pid) if pid == target.pid() => {
                    self.registry.mark_reaped(pid);
                    state = state.on_target_exit(status);
                    tracing::info!("Target finished: {}", describe_status(&status));

                    if state.profiler_done() {
                        continue;
                    }
                    // Both may have exited before this wait; the older
                    // target is reported first, the profiler is a zombie.
                    match profiler.try_wait()? {
                        Some(profiler_status) => {
                            state = self.profiler_exited(profiler, state, profiler_status);
                        }
                        None => {
                            tracing::info!(
                                "Stopping profiler (PID {}) with {:?}",
                                profiler.pid(),
                                self.stop_signal
                            );
                            profiler.signal(self.stop_signal)?;
                            profiler_signalled = true;
                        }
                    }
                }
                Some(pid) if pid == profiler.pid() => {
                    state = self.profiler_exited(profiler, state, status);
                }
                other => {
                    tracing::debug!("Ignoring wait status for unknown child {:?}", other);
                }
            }
        };

        Ok(ReapOutcome {
            target_status,
            profiler_status,
            profiler_signalled,
        })
    }

    fn profiler_exited(
        &mut self,
        profiler: ProcessHandle,
        state: ReapState,
        status: WaitStatus,
    ) -> ReapState {
        self.registry.mark_reaped(profiler.pid());
        tracing::info!("Profiler finished: {}", describe_status(&status));
        state.on_profiler_exit(status)
    }

    fn transition(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("State {} -> {}", self.state, next);
        self.state = next;
    }
}

fn unix_millis(at: SystemTime) -> u128 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
