//! FIFO-backed channel implementation (Unix).
//!
//! Records are `i32` values in native byte order. A read or write that moves
//! fewer than [`RECORD_SIZE`] bytes is reported as
//! [`ChannelError::Truncated`]; callers treat it as fatal.
//!
//! # Example
//!
//! ```no_run
//! use pipevisor::channel::Channel;
//!
//! let ch = Channel::new("/tmp/demo-fifo");
//! ch.recreate()?;
//! // in another process: Channel::new("/tmp/demo-fifo").open_read()?.read_record()?
//! let mut w = ch.open_write()?; // blocks until a reader shows up
//! w.write_record(7)?;
//! # Ok::<(), pipevisor::ChannelError>(())
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;

use crate::error::ChannelError;

/// Size in bytes of one record.
pub const RECORD_SIZE: usize = std::mem::size_of::<i32>();

/// Named FIFO identified by its path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    path: PathBuf,
}

/// Write end of a channel.
#[derive(Debug)]
pub struct ChannelWriter {
    file: File,
    path: PathBuf,
}

/// Read end of a channel.
#[derive(Debug)]
pub struct ChannelReader {
    file: File,
    path: PathBuf,
}

impl Channel {
    /// Names a channel; nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Channel path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if a filesystem node exists at the channel path.
    pub fn exists(&self) -> bool {
        self.path.symlink_metadata().is_ok()
    }

    /// Creates the FIFO with `rw-rw-rw-` permission bits (masked by umask).
    ///
    /// Fails with [`ChannelError::AlreadyExists`] if anything occupies the path.
    /// A missing parent directory is an [`ChannelError::Io`], not `NotFound`.
    pub fn create(&self) -> Result<(), ChannelError> {
        let mode = Mode::from_bits_truncate(0o666);
        mkfifo(&self.path, mode).map_err(|e| match e {
            Errno::EEXIST => ChannelError::AlreadyExists {
                path: self.path.clone(),
            },
            other => ChannelError::Io {
                path: self.path.clone(),
                source: io::Error::from(other),
            },
        })
    }

    /// Removes any stale node at the path, then creates a fresh FIFO.
    pub fn recreate(&self) -> Result<(), ChannelError> {
        self.remove();
        self.create()
    }

    /// Opens the write end, blocking until a reader opens the other end.
    pub fn open_write(&self) -> Result<ChannelWriter, ChannelError> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| ChannelError::from_io(&self.path, e))?;
        Ok(ChannelWriter {
            file,
            path: self.path.clone(),
        })
    }

    /// Opens the read end, blocking until a writer opens the other end.
    pub fn open_read(&self) -> Result<ChannelReader, ChannelError> {
        let file = OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(|e| ChannelError::from_io(&self.path, e))?;
        Ok(ChannelReader {
            file,
            path: self.path.clone(),
        })
    }

    /// Best-effort removal; a missing node is not an error.
    pub fn remove(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

impl ChannelWriter {
    /// Writes one record, blocking until all of it is accepted by the pipe.
    pub fn write_record(&mut self, value: i32) -> Result<(), ChannelError> {
        let buf = value.to_ne_bytes();
        let mut sent = 0;
        while sent < buf.len() {
            match self.file.write(&buf[sent..]) {
                Ok(0) => {
                    return Err(ChannelError::Truncated {
                        path: self.path.clone(),
                        got: sent,
                        want: RECORD_SIZE,
                    });
                }
                Ok(n) => sent += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(ChannelError::from_io(&self.path, e)),
            }
        }
        Ok(())
    }
}

impl ChannelReader {
    /// Reads one record, blocking until it is complete or the writer closes.
    pub fn read_record(&mut self) -> Result<i32, ChannelError> {
        let mut buf = [0u8; RECORD_SIZE];
        let mut got = 0;
        while got < buf.len() {
            match self.file.read(&mut buf[got..]) {
                Ok(0) => {
                    return Err(ChannelError::Truncated {
                        path: self.path.clone(),
                        got,
                        want: RECORD_SIZE,
                    });
                }
                Ok(n) => got += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(ChannelError::from_io(&self.path, e)),
            }
        }
        Ok(i32::from_ne_bytes(buf))
    }
}
