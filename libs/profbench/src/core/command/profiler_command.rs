// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use nix::unistd::Pid;

/// `<pid_flag><pid>`, e.g. `--pid=4242`.
///
/// No separator is inserted between the flag and the digits; a flag that
/// needs one must carry it (`"-p "`).
pub fn pid_fragment(pid_flag: &str, target_pid: Pid) -> String {
    format!("{}{}", pid_flag, target_pid)
}

/// Append the live target PID to the profiler command template.
pub fn build_profiler_command(template: &str, target_pid: Pid, pid_flag: &str) -> String {
    format!("{} {}", template, pid_fragment(pid_flag, target_pid))
}
