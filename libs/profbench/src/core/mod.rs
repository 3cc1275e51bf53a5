// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod command;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod rendezvous;
pub mod subprocess;

pub use command::*;
pub use config::BenchConfig;
pub use error::*;
pub use orchestrator::*;
pub use rendezvous::*;
pub use subprocess::{ChildRegistry, ChildRole, Forked, ProcessHandle, describe_status};
