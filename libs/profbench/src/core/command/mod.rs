// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Command-line assembly for the target and the profiler.

mod profiler_command;
mod tokenizer;

pub use profiler_command::{build_profiler_command, pid_fragment};
pub use tokenizer::{CommandLine, DEFAULT_DELIMITER};
