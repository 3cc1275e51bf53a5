// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Fork/exec plumbing for the target and profiler children.

pub mod launcher;
mod process_handle;
mod registry;

pub use process_handle::{ChildRole, Forked, ProcessHandle, describe_status};
pub use registry::ChildRegistry;
