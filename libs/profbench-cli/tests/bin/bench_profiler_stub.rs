// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Stand-in profiler for the profbench integration tests.
//!
//! Echoes its argument vector as `profiler argv: <args...>`. With
//! `--linger` it stays alive until SIGINT and then prints
//! `profiler interrupted`; without it, it exits immediately.
//! `--touch=<path>` creates a ready file once the SIGINT handler is armed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use signal_hook::consts::signal::SIGINT;

const LINGER_LIMIT: Duration = Duration::from_secs(30);

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    println!("profiler argv: {}", args.join(" "));

    let linger = args.iter().any(|arg| arg == "--linger");
    let touch = args
        .iter()
        .find_map(|arg| arg.strip_prefix("--touch=").map(str::to_owned));

    let interrupted = Arc::new(AtomicBool::new(false));
    if let Err(e) = signal_hook::flag::register(SIGINT, Arc::clone(&interrupted)) {
        eprintln!("profiler stub: failed to register SIGINT handler: {}", e);
        std::process::exit(2);
    }

    if let Some(path) = touch {
        if let Err(e) = std::fs::write(&path, b"ready\n") {
            eprintln!("profiler stub: failed to create {}: {}", path, e);
            std::process::exit(2);
        }
    }

    if !linger {
        return;
    }

    let start = Instant::now();
    while !interrupted.load(Ordering::Relaxed) {
        if start.elapsed() > LINGER_LIMIT {
            println!("profiler gave up waiting");
            std::process::exit(3);
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    println!("profiler interrupted");
}
