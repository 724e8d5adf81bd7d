//! # Reaper: collects terminated workers and advances the completion counter.
//!
//! ```text
//! SIGCHLD ──► forwarder ──► Notify ──► Reaper::run
//!                                         │
//!                                    drain(): loop {
//!                                      Reap::try_reap()  ── None ──► back to waiting
//!                                         │ Some(ExitRecord)
//!                                      WorkerTable::mark_exited(pid)
//!                                         │ first transition + counted role
//!                                      CompletionCounter::add(2)
//!                                      stdout + Bus.publish(WorkerExited)
//!                                    }
//! ```
//!
//! ## Rules
//! - One wakeup may stand for several terminations; every wakeup drains until
//!   nothing is pending.
//! - A termination adds to the counter only if the pid belongs to a counted
//!   role and this is its first observed exit.
//! - Unknown pids are still collected (no zombies) and reported without a role.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::config::COMPLETION_INCREMENT;
use crate::core::{CompletionCounter, ExitRecord, Reap, WorkerTable};
use crate::events::{Bus, Event, EventKind};

/// Collects terminated children and accounts for them.
pub struct Reaper<R: Reap> {
    source: R,
    table: Arc<WorkerTable>,
    counter: Arc<CompletionCounter>,
    bus: Bus,
}

impl<R: Reap> Reaper<R> {
    /// Creates a reaper over `source`.
    pub fn new(
        source: R,
        table: Arc<WorkerTable>,
        counter: Arc<CompletionCounter>,
        bus: Bus,
    ) -> Self {
        Self {
            source,
            table,
            counter,
            bus,
        }
    }

    /// Waits for wakeups and drains on each; performs a final drain on cancellation.
    pub async fn run(mut self, wakeups: Arc<Notify>, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    self.drain();
                    break;
                }
                _ = wakeups.notified() => {
                    self.drain();
                }
            }
        }
    }

    /// Collects every pending termination. Returns how many were collected.
    pub fn drain(&mut self) -> usize {
        let mut collected = 0;
        loop {
            match self.source.try_reap() {
                Ok(Some(exit)) => {
                    collected += 1;
                    self.account(exit);
                }
                Ok(None) => break,
                Err(e) => {
                    eprintln!("[pipevisor] reaper: wait failed: {e}");
                    break;
                }
            }
        }
        collected
    }

    fn account(&self, exit: ExitRecord) {
        let pid = exit.worker_id;
        let mut ev = Event::new(EventKind::WorkerExited);

        let counter = match self.table.mark_exited(pid) {
            Some(handle) => {
                ev = ev.with_worker(pid, handle.role);
                if handle.role.is_counted() {
                    self.counter.add(COMPLETION_INCREMENT)
                } else {
                    self.counter.get()
                }
            }
            None => self.counter.get(),
        };

        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{exit}. Counter: {counter}");
        let _ = out.flush();

        self.bus.publish(ev.with_exit(exit).with_counter(counter));
    }
}
