// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Child process lifecycle management.

use std::fmt;

use nix::sys::signal::{self, Signal};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork};

use crate::core::{BenchError, Result};

/// Which of the two cooperating children a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    Target,
    Profiler,
}

impl fmt::Display for ChildRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildRole::Target => write!(f, "target"),
            ChildRole::Profiler => write!(f, "profiler"),
        }
    }
}

/// Result of [`ProcessHandle::fork`], seen from each side.
#[derive(Debug)]
pub enum Forked {
    /// Still the orchestrator; holds the new child's handle.
    Parent(ProcessHandle),
    /// Running inside the freshly created child.
    Child,
}

/// Handle to a forked child.
///
/// Plain data: dropping it neither signals nor reaps the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle {
    pid: Pid,
    role: ChildRole,
}

impl ProcessHandle {
    pub(crate) fn new(pid: Pid, role: ChildRole) -> Self {
        Self { pid, role }
    }

    /// Fork the calling process.
    pub fn fork(role: ChildRole) -> Result<Forked> {
        // SAFETY: the orchestrator runs on a single thread (no async runtime,
        // no worker threads), so the child inherits no lock held elsewhere.
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                tracing::info!("Launched {} with PID {}", role, child);
                Ok(Forked::Parent(Self::new(child, role)))
            }
            Ok(ForkResult::Child) => Ok(Forked::Child),
            Err(e) => Err(BenchError::system_call("fork", e)),
        }
    }

    /// Get the process ID.
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Get the role this child plays.
    pub fn role(&self) -> ChildRole {
        self.role
    }

    /// Deliver `sig` to the child.
    pub fn signal(&self, sig: Signal) -> Result<()> {
        signal::kill(self.pid, sig).map_err(|e| BenchError::system_call("kill", e))
    }

    /// Force kill the process.
    pub fn kill(&self) -> Result<()> {
        tracing::warn!("Force killing {} (PID {})", self.role, self.pid);
        self.signal(Signal::SIGKILL)
    }

    /// Block until this specific child terminates.
    pub fn wait(&self) -> Result<WaitStatus> {
        waitpid(self.pid, None).map_err(|e| BenchError::system_call("waitpid", e))
    }

    /// Collect the exit status if the child has already terminated.
    ///
    /// Returns `None` while it is still running. A `Some` reaps the child.
    pub fn try_wait(&self) -> Result<Option<WaitStatus>> {
        match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => Ok(None),
            Ok(status) => Ok(Some(status)),
            Err(e) => Err(BenchError::system_call("waitpid", e)),
        }
    }
}

/// Human-readable summary of how a child ended.
pub fn describe_status(status: &WaitStatus) -> String {
    match status {
        WaitStatus::Exited(_, code) => format!("exited with code {}", code),
        WaitStatus::Signaled(_, sig, core_dumped) => {
            if *core_dumped {
                format!("killed by {:?} (core dumped)", sig)
            } else {
                format!("killed by {:?}", sig)
            }
        }
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    #[test]
    fn test_role_display() {
        assert_eq!(ChildRole::Target.to_string(), "target");
        assert_eq!(ChildRole::Profiler.to_string(), "profiler");
    }

    #[test]
    fn test_describe_exit_and_signal() {
        let pid = Pid::from_raw(10);
        assert_eq!(
            describe_status(&WaitStatus::Exited(pid, 3)),
            "exited with code 3"
        );
        assert_eq!(
            describe_status(&WaitStatus::Signaled(pid, Signal::SIGINT, false)),
            "killed by SIGINT"
        );
        assert_eq!(
            describe_status(&WaitStatus::Signaled(pid, Signal::SIGSEGV, true)),
            "killed by SIGSEGV (core dumped)"
        );
    }

    #[test]
    #[serial]
    fn test_try_wait_collects_exited_child() {
        let handle = match ProcessHandle::fork(ChildRole::Profiler).unwrap() {
            Forked::Parent(handle) => handle,
            Forked::Child => unsafe { libc::_exit(4) },
        };
        std::thread::sleep(Duration::from_millis(100));

        let status = handle.try_wait().unwrap();
        assert_eq!(status, Some(WaitStatus::Exited(handle.pid(), 4)));

        // Already reaped: nothing left to collect.
        assert!(handle.try_wait().is_err());
    }

    #[test]
    #[serial]
    fn test_try_wait_on_running_child_returns_none() {
        let handle = match ProcessHandle::fork(ChildRole::Profiler).unwrap() {
            Forked::Parent(handle) => handle,
            Forked::Child => loop {
                std::thread::sleep(Duration::from_secs(1));
            },
        };

        assert_eq!(handle.try_wait().unwrap(), None);

        handle.kill().unwrap();
        assert_eq!(
            handle.wait().unwrap(),
            WaitStatus::Signaled(handle.pid(), Signal::SIGKILL, false)
        );
    }
}
