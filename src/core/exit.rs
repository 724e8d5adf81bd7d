//! Classification of an observed worker termination.

use std::fmt;

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

/// How a worker ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitClass {
    /// The process called `exit(code)`.
    ExitedNormally(i32),
    /// The process was killed by signal `signum`.
    KilledBySignal(i32),
}

/// One observed termination, produced by the reaper and consumed only as a log record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitRecord {
    /// Process id of the terminated worker.
    pub worker_id: Pid,
    /// Exit classification.
    pub class: ExitClass,
}

impl ExitRecord {
    /// Record for a normal exit.
    pub fn exited(worker_id: Pid, code: i32) -> Self {
        Self {
            worker_id,
            class: ExitClass::ExitedNormally(code),
        }
    }

    /// Record for a signal kill.
    pub fn killed(worker_id: Pid, signum: i32) -> Self {
        Self {
            worker_id,
            class: ExitClass::KilledBySignal(signum),
        }
    }

    /// Converts a wait status into a record.
    ///
    /// Returns `None` for statuses that are not terminations (still alive,
    /// stopped, continued, ptrace events).
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(pid, code) => Some(Self::exited(pid, code)),
            WaitStatus::Signaled(pid, sig, _core) => Some(Self::killed(pid, sig as i32)),
            _ => None,
        }
    }

    /// True for a normal exit.
    pub fn normal(&self) -> bool {
        matches!(self.class, ExitClass::ExitedNormally(_))
    }

    /// Exit code or signal number.
    pub fn code_or_signal(&self) -> i32 {
        match self.class {
            ExitClass::ExitedNormally(c) | ExitClass::KilledBySignal(c) => c,
        }
    }
}

impl fmt::Display for ExitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            ExitClass::ExitedNormally(code) => write!(
                f,
                "Child process {} exited normally with status {code}",
                self.worker_id
            ),
            ExitClass::KilledBySignal(sig) => write!(
                f,
                "Child process {} terminated by signal {sig}",
                self.worker_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;

    #[test]
    fn wait_statuses_are_classified() {
        let pid = Pid::from_raw(77);

        let rec = ExitRecord::from_wait_status(WaitStatus::Exited(pid, 1)).unwrap();
        assert!(rec.normal());
        assert_eq!(rec.code_or_signal(), 1);

        let rec =
            ExitRecord::from_wait_status(WaitStatus::Signaled(pid, Signal::SIGTERM, false)).unwrap();
        assert!(!rec.normal());
        assert_eq!(rec.code_or_signal(), 15);
        assert_eq!(rec.to_string(), "Child process 77 terminated by signal 15");

        assert!(ExitRecord::from_wait_status(WaitStatus::StillAlive).is_none());
        assert!(ExitRecord::from_wait_status(WaitStatus::Continued(pid)).is_none());
    }
}
