// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! One-shot, one-byte handshake over a pipe.
//!
//! The orchestrator holds the write end and the target holds the read end.
//! The target blocks in [`RendezvousReceiver::wait`] until the orchestrator
//! calls [`RendezvousSender::signal`]. If every copy of the write end is
//! closed first, the read observes end-of-stream and the wait fails with
//! [`BenchError::ChannelClosed`]. That is why each process must close the
//! ends it does not use: one stray writer keeps the reader blocked forever.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{IntoRawFd, OwnedFd};

use crate::core::{BenchError, Result};

/// Byte written to release the target.
pub const RELEASE_SENTINEL: u8 = b'?';

/// Factory for the two ends of a rendezvous pipe.
pub struct RendezvousChannel;

impl RendezvousChannel {
    /// Create the pipe. Must happen before any fork so both children inherit it.
    pub fn create() -> Result<(RendezvousSender, RendezvousReceiver)> {
        let (read_end, write_end) =
            nix::unistd::pipe().map_err(|e| BenchError::system_call("pipe", e))?;

        tracing::debug!("Created rendezvous channel");

        Ok((
            RendezvousSender { fd: write_end },
            RendezvousReceiver { fd: read_end },
        ))
    }
}

/// Write end. Consumed by [`signal`](Self::signal), so the sentinel is sent at most once.
#[derive(Debug)]
pub struct RendezvousSender {
    fd: OwnedFd,
}

impl RendezvousSender {
    /// Write the sentinel byte and close the write end.
    pub fn signal(self) -> Result<()> {
        let mut file = File::from(self.fd);

        match file.write(&[RELEASE_SENTINEL]) {
            Ok(1) => {}
            Ok(_) => {
                return Err(BenchError::system_call(
                    "write",
                    std::io::Error::new(ErrorKind::WriteZero, "sentinel byte not written"),
                ));
            }
            Err(e) => return Err(BenchError::system_call("write", e)),
        }

        close_fd(OwnedFd::from(file))
    }

    /// Close without signalling.
    pub fn close(self) -> Result<()> {
        close_fd(self.fd)
    }
}

/// Read end.
#[derive(Debug)]
pub struct RendezvousReceiver {
    fd: OwnedFd,
}

impl RendezvousReceiver {
    /// Block until the sentinel arrives, then close the read end.
    ///
    /// Returns the byte received. There is no timeout.
    pub fn wait(self) -> Result<u8> {
        let mut file = File::from(self.fd);
        let mut buf = [0u8; 1];

        let read = loop {
            match file.read(&mut buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match read {
            Ok(0) => Err(BenchError::ChannelClosed),
            Ok(_) => {
                close_fd(OwnedFd::from(file))?;
                Ok(buf[0])
            }
            Err(e) => Err(BenchError::system_call("read", e)),
        }
    }

    /// Close without waiting.
    pub fn close(self) -> Result<()> {
        close_fd(self.fd)
    }
}

fn close_fd(fd: OwnedFd) -> Result<()> {
    nix::unistd::close(fd.into_raw_fd()).map_err(|e| BenchError::system_call("close", e))
}
