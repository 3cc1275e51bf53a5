// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Stand-in workload for the profbench integration tests.
//!
//! Prints `target pid=<pid> started_at_ms=<unix millis>` as soon as its
//! image starts, so tests can check it ran after the release point.
//!
//! Flags: `--sleep-ms=<N>` to keep running, `--exit-code=<N>` to fail.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn main() {
    let started_at_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    println!(
        "target pid={} started_at_ms={}",
        std::process::id(),
        started_at_ms
    );

    let mut sleep_ms = 0u64;
    let mut exit_code = 0i32;
    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--sleep-ms=") {
            sleep_ms = value.parse().unwrap_or(0);
        } else if let Some(value) = arg.strip_prefix("--exit-code=") {
            exit_code = value.parse().unwrap_or(1);
        }
    }

    if sleep_ms > 0 {
        std::thread::sleep(Duration::from_millis(sleep_ms));
    }

    println!("target done");
    std::process::exit(exit_code);
}
