//! # Worker abstraction and process entry point.
//!
//! A [`Worker`] performs exactly one channel exchange. [`run_worker`] wraps it
//! with the fixed lifecycle every worker process follows:
//!
//! ```text
//! record "started" ─► exchange() ─┬─ Ok  ─► hold ─► record "exiting" ─► exit 0
//!                                 └─ Err ─► record error ──────────────► exit 1
//! ```
//!
//! There is no retry: a single producer and a single consumer have no
//! redundancy to fall back on.

use std::process::ExitCode;
use std::time::Duration;

use crate::config::Config;
use crate::error::WorkerError;
use crate::journal::Journal;

use super::{Consumer, Producer, Role};

/// One-shot unit of channel work.
pub trait Worker {
    /// Role of this worker.
    fn role(&self) -> Role;

    /// Performs the channel exchange and returns the value it moved.
    fn exchange(&self) -> Result<i32, WorkerError>;
}

/// Drives `worker` through its lifecycle.
///
/// On failure the error is recorded before it is returned; the hold window is
/// skipped so the process ends immediately.
pub fn run_worker<W: Worker + ?Sized>(
    worker: &W,
    hold: Duration,
    journal: &Journal,
) -> Result<i32, WorkerError> {
    let role = worker.role();
    journal.record(&format!("{role} started"));

    match worker.exchange() {
        Ok(value) => {
            std::thread::sleep(hold);
            journal.record(&format!("{role}: exiting normally"));
            Ok(value)
        }
        Err(e) => {
            journal.record(&e.to_string());
            Err(e)
        }
    }
}

/// Entry point of a re-executed worker process.
pub fn run_role(role: Role, cfg: &Config) -> ExitCode {
    let journal = Journal::new(&cfg.log_file);
    let res = match role {
        Role::Producer => run_worker(&Producer::new(cfg, &journal), cfg.hold(), &journal),
        Role::Consumer => run_worker(&Consumer::new(cfg, &journal), cfg.hold(), &journal),
        Role::Supervisor => {
            let e = WorkerError::NotAWorker { role };
            journal.record(&e.to_string());
            Err(e)
        }
    };
    match res {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelError;

    struct Fixed(Option<i32>);

    impl Worker for Fixed {
        fn role(&self) -> Role {
            Role::Consumer
        }

        fn exchange(&self) -> Result<i32, WorkerError> {
            self.0.ok_or(WorkerError::Open {
                role: Role::Consumer,
                source: ChannelError::NotFound {
                    path: "fifo2".into(),
                },
            })
        }
    }

    #[test]
    fn success_holds_and_failure_skips_hold() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path().join("logs.txt"));

        assert_eq!(
            run_worker(&Fixed(Some(1)), Duration::from_millis(10), &journal).unwrap(),
            1
        );

        let started = std::time::Instant::now();
        let err = run_worker(&Fixed(None), Duration::from_secs(60), &journal).unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(err.as_label(), "worker_channel_open");

        let log = std::fs::read_to_string(journal.path()).unwrap();
        assert!(log.contains("consumer started"));
        assert!(log.contains("consumer: exiting normally"));
        assert!(log.contains("failed to open channel"));
    }

    #[test]
    fn supervisor_role_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::default().rooted_at(dir.path());
        let _ = run_role(Role::Supervisor, &cfg);

        let log = std::fs::read_to_string(&cfg.log_file).unwrap();
        assert!(log.contains("does not run as a worker process"));
    }
}
