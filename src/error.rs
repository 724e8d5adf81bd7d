//! Error types used by channels, workers and the coordinating runtime.
//!
//! This module defines three enums:
//!
//! - [`ChannelError`]: failures of a single FIFO operation.
//! - [`WorkerError`]: fatal failures inside a worker process (the worker exits 1).
//! - [`RuntimeError`]: failures of the coordinator itself.
//!
//! All of them provide `as_label` for logs. Nothing here is retryable: every
//! I/O failure is fail-fast.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::workers::Role;

/// # Errors produced by channel operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ChannelError {
    /// A filesystem node already occupies the channel name.
    #[error("channel {path:?} already exists")]
    AlreadyExists {
        /// Channel path.
        path: PathBuf,
    },

    /// The channel has not been created (or was removed).
    #[error("channel {path:?} not found")]
    NotFound {
        /// Channel path.
        path: PathBuf,
    },

    /// Fewer than a full record was transferred.
    #[error("truncated record on {path:?}: transferred {got} of {want} bytes")]
    Truncated {
        /// Channel path.
        path: PathBuf,
        /// Bytes actually transferred before the end of stream.
        got: usize,
        /// Record size.
        want: usize,
    },

    /// Any other OS error.
    #[error("channel {path:?}: {source}")]
    Io {
        /// Channel path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl ChannelError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use pipevisor::ChannelError;
    ///
    /// let err = ChannelError::NotFound { path: "fifo1".into() };
    /// assert_eq!(err.as_label(), "channel_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ChannelError::AlreadyExists { .. } => "channel_already_exists",
            ChannelError::NotFound { .. } => "channel_not_found",
            ChannelError::Truncated { .. } => "channel_truncated",
            ChannelError::Io { .. } => "channel_io",
        }
    }

    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => ChannelError::NotFound { path },
            io::ErrorKind::AlreadyExists => ChannelError::AlreadyExists { path },
            _ => ChannelError::Io { path, source },
        }
    }
}

/// # Fatal errors inside a worker process.
///
/// A worker never retries: any of these ends the process with status 1.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Opening one end of a channel failed.
    #[error("{role}: failed to open channel: {source}")]
    Open {
        /// Role of the failing worker.
        role: Role,
        /// Channel failure.
        #[source]
        source: ChannelError,
    },

    /// Reading or writing a record failed.
    #[error("{role}: transfer error: {source}")]
    Transfer {
        /// Role of the failing worker.
        role: Role,
        /// Channel failure.
        #[source]
        source: ChannelError,
    },

    /// The role cannot run as a worker process.
    #[error("role {role} does not run as a worker process")]
    NotAWorker {
        /// Requested role.
        role: Role,
    },
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Open { .. } => "worker_channel_open",
            WorkerError::Transfer { .. } => "worker_channel_transfer",
            WorkerError::NotAWorker { .. } => "worker_bad_role",
        }
    }
}

/// # Errors produced by the coordinating runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Creating one of the FIFOs failed; nothing was launched.
    #[error("failed to create channels: {0}")]
    ChannelCreation(#[source] ChannelError),

    /// The coordinator could not open or write channel A.
    #[error("coordinator channel failure: {0}")]
    Channel(#[source] ChannelError),

    /// A worker process could not be spawned.
    #[error("failed to launch {role}: {source}")]
    Launch {
        /// Role that failed to start.
        role: Role,
        /// Spawn error.
        #[source]
        source: io::Error,
    },

    /// Installing a signal listener failed.
    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    /// A blocking helper task died before reporting.
    #[error("background task failed: {0}")]
    Join(String),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use pipevisor::{ChannelError, RuntimeError};
    ///
    /// let err = RuntimeError::ChannelCreation(ChannelError::AlreadyExists { path: "fifo1".into() });
    /// assert_eq!(err.as_label(), "runtime_channel_creation");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::ChannelCreation(_) => "runtime_channel_creation",
            RuntimeError::Channel(_) => "runtime_channel",
            RuntimeError::Launch { .. } => "runtime_launch",
            RuntimeError::Signal(_) => "runtime_signal",
            RuntimeError::Join(_) => "runtime_join",
        }
    }
}
