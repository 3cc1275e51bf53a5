// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Run orchestration: spawn, release, reap.

mod bench_orchestrator;
mod reap_state;
mod release_policy;
mod run_state;

pub use bench_orchestrator::{Orchestrator, RunReport};
pub use reap_state::ReapState;
pub use release_policy::{ReleaseOutcome, ReleasePolicy};
pub use run_state::RunState;
