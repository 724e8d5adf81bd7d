//! # Runtime events emitted by the coordinator, reaper and supervisor.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Run events**: channel setup, input handoff, wait-loop progress, cleanup
//! - **Worker events**: launch and reaped termination
//! - **Supervisor events**: lifecycle, operator requests, timeout
//! - **Subscriber events**: fan-out problems
//!
//! The [`Event`] struct carries metadata such as timestamps, worker id, exit
//! classification and counter value.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use nix::unistd::Pid;
//! use pipevisor::{Event, EventKind, ExitRecord, Role};
//!
//! let ev = Event::new(EventKind::WorkerExited)
//!     .with_worker(Pid::from_raw(42), Role::Producer)
//!     .with_exit(ExitRecord::exited(Pid::from_raw(42), 0))
//!     .with_counter(2);
//!
//! assert_eq!(ev.kind, EventKind::WorkerExited);
//! assert_eq!(ev.counter, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use nix::unistd::Pid;

use crate::core::ExitRecord;
use crate::workers::Role;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and cause
    SubscriberOverflow,

    // === Run events ===
    /// Coordinator started a run.
    RunStarted,

    /// Both channels were (re)created.
    ChannelsCreated,

    /// Creating a channel failed; the run is aborted.
    ///
    /// Sets:
    /// - `reason`: channel error
    ChannelsFailed,

    /// Coordinator wrote both inputs into channel A.
    ///
    /// Sets:
    /// - `inputs`: `(first, second)`
    InputsWritten,

    /// Coordinator could not open or write channel A.
    ///
    /// Sets:
    /// - `reason`: channel error
    InputsFailed,

    /// One iteration of the coordinator wait loop.
    ///
    /// Sets:
    /// - `counter`: value observed
    Proceeding,

    /// Run is over; channels are being removed.
    RunFinished,

    // === Worker events ===
    /// A worker process was launched.
    ///
    /// Sets:
    /// - `worker`, `role`
    WorkerLaunched,

    /// The reaper observed a worker termination.
    ///
    /// Sets:
    /// - `worker`, `role` (if known)
    /// - `exit`: classification
    /// - `counter`: value after the increment
    WorkerExited,

    // === Supervisor events ===
    /// Supervisor entered monitoring.
    SupervisorStarted,

    /// Diagnostic ping received (`SIGUSR1`).
    DiagnosticPing,

    /// Reconfigure request received (`SIGHUP`).
    ReconfigureRequested,

    /// Graceful shutdown request received (`SIGTERM`).
    ShutdownRequested,

    /// Supervisor timeout reached; workers are being terminated.
    ///
    /// Sets:
    /// - `timeout_ms`
    TimeoutHit,

    /// Sending a termination request to a worker failed.
    ///
    /// Sets:
    /// - `worker`, `role`, `reason`
    TerminateFailed,

    /// Supervisor observed both workers terminated.
    AllCompleted,

    /// Supervisor task is ending.
    SupervisorStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Worker process id, if applicable.
    pub worker: Option<Pid>,
    /// Worker role, if known.
    pub role: Option<Role>,
    /// Exit classification (only for `WorkerExited`).
    pub exit: Option<ExitRecord>,
    /// Completion counter value.
    pub counter: Option<u32>,
    /// Input pair written into channel A.
    pub inputs: Option<(i32, i32)>,
    /// Supervisor timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            role: None,
            exit: None,
            counter: None,
            inputs: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches a worker id and role.
    #[inline]
    pub fn with_worker(mut self, id: Pid, role: Role) -> Self {
        self.worker = Some(id);
        self.role = Some(role);
        self
    }

    /// Attaches an exit record (and its worker id).
    #[inline]
    pub fn with_exit(mut self, exit: ExitRecord) -> Self {
        self.worker = Some(exit.worker_id);
        self.exit = Some(exit);
        self
    }

    /// Attaches a counter value.
    #[inline]
    pub fn with_counter(mut self, value: u32) -> Self {
        self.counter = Some(value);
        self
    }

    /// Attaches the input pair.
    #[inline]
    pub fn with_inputs(mut self, first: i32, second: i32) -> Self {
        self.inputs = Some((first, second));
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }
}
