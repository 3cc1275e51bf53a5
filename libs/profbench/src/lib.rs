// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Launch a workload under a profiler that attaches before the workload starts.
//!
//! The orchestrator forks the target, which blocks on a one-byte rendezvous
//! pipe, then forks the profiler with the target's PID appended to its
//! command line. After the release policy is satisfied the target is let go.
//! When the target exits, the profiler is asked to stop, and both exit
//! statuses are collected.

pub mod core;

pub use crate::core::{
    BenchConfig, BenchError, ChildRole, CommandLine, Orchestrator, ReleaseOutcome, ReleasePolicy,
    Result, RunReport, RunState,
};
