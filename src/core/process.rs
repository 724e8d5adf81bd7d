//! # OS process seams: launching, reaping and terminating workers.
//!
//! The runtime talks to the operating system through three small traits so the
//! reaper and supervisor can be exercised without real children:
//!
//! - [`Launch`] starts a worker for a [`Role`]
//! - [`Reap`] is a non-blocking wait-any-child primitive
//! - [`Terminate`] delivers a termination request
//!
//! [`ProcessLauncher`], [`WaitAnyChild`] and [`SigTerm`] are the Unix
//! implementations used by the binary.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

use crate::config::Config;
use crate::core::ExitRecord;
use crate::workers::{Role, WorkerHandle};

/// Starts a worker process.
pub trait Launch: Send + Sync {
    /// Launches `role` and returns its handle.
    fn launch(&self, role: Role) -> io::Result<WorkerHandle>;
}

/// Non-blocking wait-any-child primitive.
pub trait Reap: Send + 'static {
    /// Collects one terminated child, or `None` when nothing is pending.
    fn try_reap(&mut self) -> io::Result<Option<ExitRecord>>;
}

/// Delivers a termination request to a worker.
pub trait Terminate: Send + Sync + 'static {
    /// Asks `pid` to terminate. Best effort: the worker may still finish its transfer.
    fn terminate(&self, pid: Pid) -> io::Result<()>;
}

/// Launches workers by re-executing a program with the hidden `--worker` flag.
#[derive(Clone, Debug)]
pub struct ProcessLauncher {
    program: PathBuf,
    cfg: Config,
}

impl ProcessLauncher {
    /// Launcher re-executing `program`.
    pub fn new(program: impl Into<PathBuf>, cfg: Config) -> Self {
        Self {
            program: program.into(),
            cfg,
        }
    }

    /// Launcher re-executing the running binary.
    pub fn current_exe(cfg: Config) -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, cfg))
    }

    /// Command-line arguments handing `role` and the run's configuration to a worker.
    pub fn worker_args(&self, role: Role) -> Vec<String> {
        let cfg = &self.cfg;
        vec![
            "--worker".into(),
            role.as_str().into(),
            "--channel-a".into(),
            cfg.channel_a.display().to_string(),
            "--channel-b".into(),
            cfg.channel_b.display().to_string(),
            "--log-file".into(),
            cfg.log_file.display().to_string(),
            "--time-unit-ms".into(),
            cfg.time_unit.as_millis().to_string(),
            "--hold-units".into(),
            cfg.hold_units.to_string(),
        ]
    }
}

impl Launch for ProcessLauncher {
    fn launch(&self, role: Role) -> io::Result<WorkerHandle> {
        let child = Command::new(&self.program)
            .args(self.worker_args(role))
            .stdin(Stdio::null())
            .spawn()?;
        // The child is collected by the reaper, never through `Child::wait`.
        let pid = i32::try_from(child.id())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "pid out of range"))?;
        Ok(WorkerHandle::new(Pid::from_raw(pid), role))
    }
}

/// `waitpid(-1, WNOHANG)` over all children of this process.
#[derive(Debug, Default)]
pub struct WaitAnyChild;

impl Reap for WaitAnyChild {
    fn try_reap(&mut self) -> io::Result<Option<ExitRecord>> {
        let any_child = Pid::from_raw(-1);
        loop {
            match waitpid(any_child, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) => return Ok(None),
                Ok(status) => {
                    if let Some(rec) = ExitRecord::from_wait_status(status) {
                        return Ok(Some(rec));
                    }
                }
                Err(Errno::ECHILD) => return Ok(None),
                Err(Errno::EINTR) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Sends `SIGTERM`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SigTerm;

impl Terminate for SigTerm {
    fn terminate(&self, pid: Pid) -> io::Result<()> {
        kill(pid, Signal::SIGTERM).map_err(io::Error::from)
    }
}
