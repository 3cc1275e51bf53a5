// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Run configuration.

mod bench_config;

pub use bench_config::BenchConfig;
