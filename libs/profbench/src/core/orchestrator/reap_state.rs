// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use nix::sys::wait::WaitStatus;

/// Which children have been reaped so far, with their exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapState {
    NeitherDone,
    TargetDone {
        target: WaitStatus,
    },
    ProfilerDone {
        profiler: WaitStatus,
    },
    BothDone {
        target: WaitStatus,
        profiler: WaitStatus,
    },
}

impl ReapState {
    pub fn on_target_exit(self, status: WaitStatus) -> Self {
        match self {
            ReapState::NeitherDone | ReapState::TargetDone { .. } => {
                ReapState::TargetDone { target: status }
            }
            ReapState::ProfilerDone { profiler } | ReapState::BothDone { profiler, .. } => {
                ReapState::BothDone {
                    target: status,
                    profiler,
                }
            }
        }
    }

    pub fn on_profiler_exit(self, status: WaitStatus) -> Self {
        match self {
            ReapState::NeitherDone | ReapState::ProfilerDone { .. } => {
                ReapState::ProfilerDone { profiler: status }
            }
            ReapState::TargetDone { target } | ReapState::BothDone { target, .. } => {
                ReapState::BothDone {
                    target,
                    profiler: status,
                }
            }
        }
    }

    pub fn profiler_done(self) -> bool {
        matches!(
            self,
            ReapState::ProfilerDone { .. } | ReapState::BothDone { .. }
        )
    }

    /// `(target, profiler)` statuses once both children are reaped.
    pub fn completed(self) -> Option<(WaitStatus, WaitStatus)> {
        match self {
            ReapState::BothDone { target, profiler } => Some((target, profiler)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;
    use nix::unistd::Pid;

    fn target_pid() -> Pid {
        Pid::from_raw(100)
    }

    fn profiler_pid() -> Pid {
        Pid::from_raw(101)
    }

    #[test]
    fn test_target_then_profiler() {
        let target = WaitStatus::Exited(target_pid(), 0);
        let profiler = WaitStatus::Signaled(profiler_pid(), Signal::SIGINT, false);

        let state = ReapState::NeitherDone.on_target_exit(target);
        assert!(!state.profiler_done());
        assert_eq!(state.completed(), None);

        let state = state.on_profiler_exit(profiler);
        assert_eq!(state.completed(), Some((target, profiler)));
    }

    #[test]
    fn test_profiler_then_target() {
        let target = WaitStatus::Exited(target_pid(), 7);
        let profiler = WaitStatus::Exited(profiler_pid(), 0);

        let state = ReapState::NeitherDone.on_profiler_exit(profiler);
        assert_eq!(state, ReapState::ProfilerDone { profiler });
        assert!(state.profiler_done());

        // Order of arrival does not change which slot a status lands in.
        assert_eq!(
            state.on_target_exit(target).completed(),
            Some((target, profiler))
        );
    }

    #[test]
    fn test_repeated_event_keeps_other_status() {
        let first = WaitStatus::Exited(target_pid(), 0);
        let second = WaitStatus::Exited(target_pid(), 1);
        let profiler = WaitStatus::Exited(profiler_pid(), 0);

        let state = ReapState::TargetDone { target: first }.on_target_exit(second);
        assert_eq!(state, ReapState::TargetDone { target: second });

        let both = ReapState::BothDone {
            target: first,
            profiler,
        };
        assert_eq!(
            both.on_profiler_exit(profiler).completed(),
            Some((first, profiler))
        );
    }
}
