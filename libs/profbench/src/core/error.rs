// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Usage error: {0}")]
    Usage(String),

    /// A pipe/fork/exec/close/read/write/wait/kill call failed.
    #[error("{call}: {source}")]
    SystemCall {
        call: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Rendezvous channel closed before the release signal was sent")]
    ChannelClosed,

    #[error("Command is empty")]
    EmptyCommand,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// Wrap an OS-level failure with the name of the call that produced it.
    pub fn system_call(call: &'static str, source: impl Into<std::io::Error>) -> Self {
        Self::SystemCall {
            call,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
