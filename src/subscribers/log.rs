//! # LogWriter: renders events into the run's journal
//!
//! A subscriber that turns every incoming [`Event`] into one
//! [`Journal`] record. Its worker task performs the file I/O, so publishers
//! (notably the reaper) never wait on the log.
//!
//! ## Example output
//! ```text
//! [Mon Oct 19 04:02:11 2026] [PID:4242] Channels created successfully
//! [Mon Oct 19 04:02:11 2026] [PID:4242] Coordinator: wrote numbers 3 and 7 to channel A
//! [Mon Oct 19 04:02:21 2026] [PID:4242] Child process 4243 exited normally with status 0
//! [Mon Oct 19 04:02:22 2026] [PID:4242] Supervisor: all child processes completed
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::journal::Journal;
use crate::subscribers::Subscribe;

/// Journal-backed logging subscriber.
pub struct LogWriter {
    journal: Journal,
}

impl LogWriter {
    /// Construct a writer appending to `journal`.
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

/// Text of the journal record for `e`.
pub(crate) fn render(e: &Event) -> String {
    let reason = e.reason.as_deref().unwrap_or("unknown");
    match e.kind {
        EventKind::RunStarted => "Program started".to_string(),
        EventKind::ChannelsCreated => "Channels created successfully".to_string(),
        EventKind::ChannelsFailed => format!("Failed to create channels: {reason}"),
        EventKind::InputsWritten => match e.inputs {
            Some((a, b)) => format!("Coordinator: wrote numbers {a} and {b} to channel A"),
            None => "Coordinator: wrote inputs to channel A".to_string(),
        },
        EventKind::InputsFailed => format!("Coordinator: failed to open channel A: {reason}"),
        EventKind::Proceeding => "Coordinator: proceeding...".to_string(),
        EventKind::RunFinished => "Coordinator: cleaning up and exiting".to_string(),
        EventKind::WorkerLaunched => format!(
            "Launched {} as process {}",
            e.role.map(|r| r.as_str()).unwrap_or("worker"),
            e.worker.map(|p| p.as_raw()).unwrap_or_default()
        ),
        EventKind::WorkerExited => match (e.exit, e.counter) {
            (Some(exit), Some(n)) => format!("{exit}. Counter: {n}"),
            (Some(exit), None) => exit.to_string(),
            _ => "Child process exited".to_string(),
        },
        EventKind::SupervisorStarted => "Supervisor started - monitoring child processes".to_string(),
        EventKind::DiagnosticPing => "Supervisor received SIGUSR1".to_string(),
        EventKind::ReconfigureRequested => {
            "Supervisor received SIGHUP - reconfiguring".to_string()
        }
        EventKind::ShutdownRequested => {
            "Supervisor received SIGTERM - shutting down gracefully".to_string()
        }
        EventKind::TimeoutHit => format!(
            "Timeout reached after {}ms - terminating inactive processes",
            e.timeout_ms.unwrap_or_default()
        ),
        EventKind::TerminateFailed => format!(
            "Failed to terminate process {}: {reason}",
            e.worker.map(|p| p.as_raw()).unwrap_or_default()
        ),
        EventKind::AllCompleted => {
            "Supervisor: all child processes completed - terminating".to_string()
        }
        EventKind::SupervisorStopped => "Supervisor stopping".to_string(),
        EventKind::SubscriberOverflow => format!("[subscriber-overflow] {reason}"),
        EventKind::SubscriberPanicked => format!("[subscriber-panicked] {reason}"),
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        self.journal.record(&render(e));
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExitRecord;
    use crate::workers::Role;
    use nix::unistd::Pid;
    use std::time::Duration;

    #[test]
    fn exit_records_carry_the_counter() {
        let pid = Pid::from_raw(4243);
        let ev = Event::new(EventKind::WorkerExited)
            .with_worker(pid, Role::Consumer)
            .with_exit(ExitRecord::exited(pid, 0))
            .with_counter(4);
        assert_eq!(
            render(&ev),
            "Child process 4243 exited normally with status 0. Counter: 4"
        );
    }

    #[test]
    fn supervisor_records() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(30));
        assert!(render(&ev).contains("30000ms"));
        assert!(render(&Event::new(EventKind::ShutdownRequested)).contains("SIGTERM"));
    }

    #[tokio::test]
    async fn writes_to_the_journal() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path().join("logs.txt"));
        let writer = LogWriter::new(journal.clone());

        writer
            .on_event(&Event::new(EventKind::InputsWritten).with_inputs(3, 7))
            .await;

        let text = std::fs::read_to_string(journal.path()).unwrap();
        assert!(text.contains("wrote numbers 3 and 7"));
    }
}
