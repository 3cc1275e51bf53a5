// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;

/// Lifecycle of a single run.
///
/// ```text
/// Init -> TargetSpawned -> ProfilerSpawned -> Released -> Reaping -> Done
///   \__________________________ any ___________________________/-> Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    TargetSpawned,
    ProfilerSpawned,
    Released,
    Reaping,
    Done,
    Aborted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Aborted)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (_, Aborted) => true,
            (Init, TargetSpawned)
            | (TargetSpawned, ProfilerSpawned)
            | (ProfilerSpawned, Released)
            | (Released, Reaping)
            | (Reaping, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Init => "INIT",
            RunState::TargetSpawned => "TARGET_SPAWNED",
            RunState::ProfilerSpawned => "PROFILER_SPAWNED",
            RunState::Released => "RELEASED",
            RunState::Reaping => "REAPING",
            RunState::Done => "DONE",
            RunState::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_is_linear() {
        let path = [
            RunState::Init,
            RunState::TargetSpawned,
            RunState::ProfilerSpawned,
            RunState::Released,
            RunState::Reaping,
            RunState::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!RunState::Init.can_transition_to(RunState::ProfilerSpawned));
        assert!(!RunState::TargetSpawned.can_transition_to(RunState::Released));
        assert!(!RunState::Released.can_transition_to(RunState::Done));
    }

    #[test]
    fn test_abort_reachable_from_every_live_state() {
        for state in [
            RunState::Init,
            RunState::TargetSpawned,
            RunState::ProfilerSpawned,
            RunState::Released,
            RunState::Reaping,
        ] {
            assert!(state.can_transition_to(RunState::Aborted));
            assert!(!state.is_terminal());
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(RunState::Done.is_terminal());
        assert!(!RunState::Done.can_transition_to(RunState::Aborted));
        assert!(!RunState::Aborted.can_transition_to(RunState::Init));
    }
}
