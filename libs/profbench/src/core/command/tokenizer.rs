// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Splits a command string into an exec-ready argument vector.
//!
//! There is no shell in between: quotes and escapes are passed through
//! verbatim, and a token is whatever sits between two delimiters.

use std::ffi::CString;
use std::fmt;
use std::str::FromStr;

use crate::core::{BenchError, Result};

/// Delimiter used for target and profiler commands.
pub const DEFAULT_DELIMITER: char = ' ';

/// An executable followed by its arguments, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Tokenize `command` on `delimiter`.
    ///
    /// Empty fields between consecutive delimiters are skipped. A command
    /// with no delimiter is a single token.
    pub fn parse(command: &str, delimiter: char) -> Result<Self> {
        let tokens: Vec<String> = command
            .split(delimiter)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();

        if tokens.is_empty() {
            return Err(BenchError::EmptyCommand);
        }

        Ok(Self { tokens })
    }

    /// The executable name, looked up on `PATH` at exec time.
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// All tokens, executable first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Convert to the `argv` handed to `execvp`.
    ///
    /// The exec wrapper appends the terminating null pointer.
    pub fn to_exec_argv(&self) -> Result<Vec<CString>> {
        self.tokens
            .iter()
            .map(|token| {
                CString::new(token.as_str()).map_err(|_| {
                    BenchError::InvalidArgument(format!("token {:?} contains a NUL byte", token))
                })
            })
            .collect()
    }
}

impl FromStr for CommandLine {
    type Err = BenchError;

    fn from_str(command: &str) -> Result<Self> {
        Self::parse(command, DEFAULT_DELIMITER)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}
