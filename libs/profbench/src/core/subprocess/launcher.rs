// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Image replacement for the two children.
//!
//! Everything here runs inside a freshly forked child. On success the
//! process image is replaced and nothing returns; on failure the child
//! reports the error and exits without touching the orchestrator's state.

use std::convert::Infallible;

use nix::sys::signal::{SigHandler, Signal, signal};
use nix::unistd::{Pid, execvp};

use super::ChildRole;
use crate::core::command::{CommandLine, DEFAULT_DELIMITER, build_profiler_command};
use crate::core::rendezvous::{RendezvousReceiver, RendezvousSender};
use crate::core::{BenchError, Result};

/// Wait for the release sentinel, then exec the target command.
pub fn launch_target(command: &CommandLine, receiver: RendezvousReceiver) -> Result<Infallible> {
    let sentinel = receiver.wait()?;
    tracing::info!(
        "Received {:?}, launching target: {}",
        sentinel as char,
        command
    );
    exec(command)
}

/// Append the target PID to the profiler template and exec it.
pub fn launch_profiler(template: &str, target_pid: Pid, pid_flag: &str) -> Result<Infallible> {
    let command_line = build_profiler_command(template, target_pid, pid_flag);
    tracing::info!("Launching profiler: {}", command_line);

    let command = CommandLine::parse(&command_line, DEFAULT_DELIMITER)?;
    exec(&command)
}

/// Child-side entry for the target. Closes the write end, then waits and execs.
pub fn run_target_child(
    command: &CommandLine,
    sender: RendezvousSender,
    receiver: RendezvousReceiver,
) -> ! {
    let result = sender
        .close()
        .and_then(|()| launch_target(command, receiver));
    exit_child(ChildRole::Target, result)
}

/// Child-side entry for the profiler. It never takes part in the
/// rendezvous, so both ends are closed before exec.
pub fn run_profiler_child(
    template: &str,
    target_pid: Pid,
    pid_flag: &str,
    sender: RendezvousSender,
    receiver: RendezvousReceiver,
) -> ! {
    let result = receiver
        .close()
        .and_then(|()| sender.close())
        .and_then(|()| launch_profiler(template, target_pid, pid_flag));
    exit_child(ChildRole::Profiler, result)
}

fn exec(command: &CommandLine) -> Result<Infallible> {
    let argv = command.to_exec_argv()?;

    // The Rust runtime ignores SIGPIPE and an ignored disposition survives
    // exec. Children get the default back, as `std::process::Command` does.
    // SAFETY: installs SIG_DFL, no handler code runs.
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) }
        .map_err(|e| BenchError::system_call("signal", e))?;

    execvp(&argv[0], &argv).map_err(|e| BenchError::system_call("execvp", e))
}

fn exit_child(role: ChildRole, result: Result<Infallible>) -> ! {
    let err = match result {
        Ok(never) => match never {},
        Err(err) => err,
    };

    tracing::error!("{} child failed before exec: {}", role, err);

    // SAFETY: `_exit` skips atexit handlers and stdio buffers inherited from
    // the orchestrator, which belong to the parent and must not run twice.
    unsafe { libc::_exit(1) }
}
