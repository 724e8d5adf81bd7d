//! # Supervisor: watches both workers and enforces the run timeout.
//!
//! The supervisor is a task inside the coordinator process. It owns no worker;
//! it observes them through the [`WorkerTable`] and can only ask them to stop.
//!
//! ## State machine
//! ```text
//! Starting ──► Monitoring ──┬── elapsed >= timeout ──► TimedOut ─────┐
//!                  ▲        │                          (SIGTERM both)│
//!                  │        ├── both reaped ─────────► AllCompleted ─┤
//!               one tick    │                                        ▼
//!                  └────────┴── shutdown requested ───────────────► Stopped
//! ```
//!
//! ## Rules
//! - One check per tick; the tick sleep is interrupted only to handle
//!   [`ControlRequest`]s, never to re-check early.
//! - The timeout check comes before the liveness check: a run whose workers
//!   finish in the same tick the timeout expires still counts as timed out.
//! - Termination requests go only to workers not yet reaped, so a recycled pid
//!   is never signalled.
//! - `Shutdown` clears the running flag; the loop notices at the next tick
//!   and stops without touching the workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::Config;
use crate::core::{ControlRequest, Terminate, WorkerTable};
use crate::events::{Bus, Event, EventKind};
use crate::workers::WorkerHandle;

/// Cleared by a graceful shutdown request.
#[derive(Debug)]
struct RunningFlag(AtomicBool);

impl RunningFlag {
    fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    /// Asks the loop to stop at its next tick.
    fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }

    fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Why the supervisor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorOutcome {
    /// Both workers were observed terminated.
    AllCompleted,
    /// The timeout expired and termination requests were sent.
    TimedOut,
    /// A graceful shutdown request ended supervision early.
    ShutdownRequested,
}

/// Timeout and liveness watchdog over the two workers.
pub struct Supervisor<T: Terminate> {
    workers: Vec<WorkerHandle>,
    table: Arc<WorkerTable>,
    terminator: T,
    bus: Bus,
    timeout: Duration,
    tick: Duration,
    running: RunningFlag,
}

impl<T: Terminate> Supervisor<T> {
    /// Creates a supervisor for `workers` with timings from `cfg`.
    pub fn new(
        cfg: &Config,
        workers: Vec<WorkerHandle>,
        table: Arc<WorkerTable>,
        terminator: T,
        bus: Bus,
    ) -> Self {
        Self {
            workers,
            table,
            terminator,
            bus,
            timeout: cfg.timeout(),
            tick: cfg.tick(),
            running: RunningFlag::new(),
        }
    }

    /// Monitors until completion, timeout or a graceful shutdown request.
    pub async fn run(
        self,
        requests: mpsc::UnboundedReceiver<ControlRequest>,
    ) -> SupervisorOutcome {
        let mut requests = Some(requests);
        let started = Instant::now();
        self.bus.publish(Event::new(EventKind::SupervisorStarted));

        let outcome = loop {
            self.sleep_tick(&mut requests).await;

            if !self.running.is_running() {
                break SupervisorOutcome::ShutdownRequested;
            }
            if started.elapsed() >= self.timeout {
                self.terminate_workers();
                break SupervisorOutcome::TimedOut;
            }
            if self.workers.iter().all(|w| !self.table.is_alive(w.id)) {
                self.bus.publish(Event::new(EventKind::AllCompleted));
                break SupervisorOutcome::AllCompleted;
            }
        };

        self.bus.publish(Event::new(EventKind::SupervisorStopped));
        outcome
    }

    /// Sleeps one tick, handling control requests as they arrive.
    async fn sleep_tick(&self, requests: &mut Option<mpsc::UnboundedReceiver<ControlRequest>>) {
        let sleep = tokio::time::sleep(self.tick);
        tokio::pin!(sleep);

        loop {
            let Some(rx) = requests.as_mut() else {
                sleep.as_mut().await;
                return;
            };
            tokio::select! {
                _ = &mut sleep => return,
                req = rx.recv() => match req {
                    Some(req) => self.handle(req),
                    None => *requests = None,
                },
            }
        }
    }

    fn handle(&self, req: ControlRequest) {
        match req {
            ControlRequest::DiagnosticPing => {
                self.bus.publish(Event::new(EventKind::DiagnosticPing));
            }
            ControlRequest::Reconfigure => {
                self.bus.publish(Event::new(EventKind::ReconfigureRequested));
            }
            ControlRequest::Shutdown => {
                self.bus.publish(Event::new(EventKind::ShutdownRequested));
                self.running.stop();
            }
        }
    }

    fn terminate_workers(&self) {
        self.bus
            .publish(Event::new(EventKind::TimeoutHit).with_timeout(self.timeout));

        for w in &self.workers {
            if !self.table.is_alive(w.id) {
                continue;
            }
            if let Err(e) = self.terminator.terminate(w.id) {
                self.bus.publish(
                    Event::new(EventKind::TerminateFailed)
                        .with_worker(w.id, w.role)
                        .with_reason(e.to_string()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::Role;
    use nix::unistd::Pid;
    use std::io;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Arc<Mutex<Vec<Pid>>>,
    }

    impl Terminate for Recorder {
        fn terminate(&self, pid: Pid) -> io::Result<()> {
            self.sent.lock().unwrap().push(pid);
            Ok(())
        }
    }

    fn cfg(timeout_units: u32) -> Config {
        Config {
            time_unit: Duration::from_millis(10),
            timeout_units,
            tick_units: 1,
            ..Config::default()
        }
    }

    fn workers(table: &WorkerTable) -> Vec<WorkerHandle> {
        let p = WorkerHandle::new(Pid::from_raw(100), Role::Producer);
        let c = WorkerHandle::new(Pid::from_raw(101), Role::Consumer);
        table.register(p);
        table.register(c);
        vec![p, c]
    }

    fn kinds(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev.kind);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_terminates_both_workers() {
        let table = Arc::new(WorkerTable::new());
        let ws = workers(&table);
        let rec = Recorder::default();
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let (_tx, req_rx) = mpsc::unbounded_channel();

        let sup = Supervisor::new(&cfg(3), ws, table, rec.clone(), bus);
        let outcome = sup.run(req_rx).await;

        assert_eq!(outcome, SupervisorOutcome::TimedOut);
        assert_eq!(
            *rec.sent.lock().unwrap(),
            vec![Pid::from_raw(100), Pid::from_raw(101)]
        );
        let seen = kinds(&mut rx);
        assert!(seen.contains(&EventKind::TimeoutHit));
        assert_eq!(seen.last(), Some(&EventKind::SupervisorStopped));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_skips_already_reaped_workers() {
        let table = Arc::new(WorkerTable::new());
        let ws = workers(&table);
        table.mark_exited(Pid::from_raw(100));
        let rec = Recorder::default();
        let (_tx, req_rx) = mpsc::unbounded_channel();

        let sup = Supervisor::new(&cfg(1), ws, table, rec.clone(), Bus::new(16));
        assert_eq!(sup.run(req_rx).await, SupervisorOutcome::TimedOut);
        assert_eq!(*rec.sent.lock().unwrap(), vec![Pid::from_raw(101)]);
    }

    #[tokio::test(start_paused = true)]
    async fn completes_when_both_workers_are_reaped() {
        let table = Arc::new(WorkerTable::new());
        let ws = workers(&table);
        let rec = Recorder::default();
        let (_tx, req_rx) = mpsc::unbounded_channel();
        let sup = Supervisor::new(&cfg(100), ws, table.clone(), rec.clone(), Bus::new(16));
        let task = tokio::spawn(sup.run(req_rx));

        tokio::time::sleep(Duration::from_millis(25)).await;
        table.mark_exited(Pid::from_raw(100));
        table.mark_exited(Pid::from_raw(101));

        assert_eq!(task.await.unwrap(), SupervisorOutcome::AllCompleted);
        assert!(rec.sent.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_request_stops_without_terminating() {
        let table = Arc::new(WorkerTable::new());
        let ws = workers(&table);
        let rec = Recorder::default();
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let (tx, req_rx) = mpsc::unbounded_channel();
        let sup = Supervisor::new(&cfg(100), ws, table, rec.clone(), bus);

        tx.send(ControlRequest::DiagnosticPing).unwrap();
        tx.send(ControlRequest::Reconfigure).unwrap();
        tx.send(ControlRequest::Shutdown).unwrap();

        assert_eq!(sup.run(req_rx).await, SupervisorOutcome::ShutdownRequested);
        assert!(rec.sent.lock().unwrap().is_empty());

        let seen = kinds(&mut rx);
        for k in [
            EventKind::DiagnosticPing,
            EventKind::ReconfigureRequested,
            EventKind::ShutdownRequested,
        ] {
            assert!(seen.contains(&k), "missing {k:?} in {seen:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn closed_request_channel_does_not_spin() {
        let table = Arc::new(WorkerTable::new());
        let ws = workers(&table);
        let (tx, req_rx) = mpsc::unbounded_channel();
        drop(tx);

        let sup = Supervisor::new(&cfg(2), ws, table, Recorder::default(), Bus::new(16));
        assert_eq!(sup.run(req_rx).await, SupervisorOutcome::TimedOut);
    }

    #[test]
    fn shutdown_clears_running_flag() {
        let table = Arc::new(WorkerTable::new());
        let sup = Supervisor::new(&cfg(1), vec![], table, Recorder::default(), Bus::new(4));
        assert!(sup.running.is_running());

        sup.handle(ControlRequest::Shutdown);
        assert!(!sup.running.is_running());
    }
}
