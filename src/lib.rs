//! # pipevisor
//!
//! **Pipevisor** runs a two-stage pipeline of worker processes linked by named
//! FIFOs, under a signal-driven reaper and a time-bounded supervisor.
//!
//! The coordinator writes two integers into channel A. The producer process
//! reads them and writes the larger into channel B. The consumer process reads
//! it and prints it. Each worker lingers for a hold window, then exits.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                       ┌──────────────────────────────────────────┐
//!  first, second ──────►│ Coordinator (async, this process)        │
//!                       │  - Bus + SubscriberSet + LogWriter       │
//!                       │  - WorkerTable (who is alive)            │
//!                       │  - CompletionCounter (+2 per worker)     │
//!                       └──┬──────────────┬───────────────┬────────┘
//!                          │ launch       │ launch        │ spawn
//!                          ▼              ▼               ▼
//!   channel A ──► ┌────────────┐  ┌────────────┐   ┌────────────┐
//!   (fifo1)       │  Producer  │─►│  Consumer  │   │ Supervisor │ tick / timeout
//!                 │  process   │  │  process   │   │   (task)   │── SIGTERM ──► workers
//!                 └─────┬──────┘  └─────┬──────┘   └────────────┘
//!                       │ channel B     │
//!                       │ (fifo2)       │
//!                       ▼ exit          ▼ exit
//!                 SIGCHLD ──► Notify ──► Reaper ──► WorkerTable / counter / Bus
//! ```
//!
//! ### Lifecycle
//! ```text
//! recreate fifo1, fifo2
//!   ├─► register SIGCHLD / SIGUSR1 / SIGHUP / SIGTERM forwarding
//!   ├─► launch producer, consumer
//!   ├─► write first, second into fifo1
//!   ├─► supervisor: every tick ─┬─ elapsed >= timeout ─► SIGTERM both
//!   │                           └─ both reaped ────────► done
//!   ├─► wait until counter == 4 ("Proceeding..." each poll)
//!   └─► remove fifo1, fifo2; flush the log
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Channels**      | Named FIFOs carrying fixed-size `i32` records.           | [`Channel`](channel::Channel)              |
//! | **Workers**       | Single-shot producer and consumer processes.             | [`Worker`], [`Role`]                       |
//! | **Reaping**       | Coalescing-safe collection of terminated children.       | [`Reaper`], [`Reap`], [`ExitRecord`]       |
//! | **Supervision**   | Timeout watchdog with ping, reconfigure and shutdown.    | [`Supervisor`], [`ControlRequest`]         |
//! | **Subscriber API**| Hook into run events (logging, custom subscribers).      | [`Subscribe`], [`LogWriter`]               |
//! | **Errors**        | Typed errors for channels, workers and the runtime.      | [`ChannelError`], [`WorkerError`], [`RuntimeError`] |
//! | **Configuration** | Centralized timings and paths.                           | [`Config`]                                 |
//!
//! ## Example
//! ```no_run
//! use pipevisor::{Config, Coordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let report = Coordinator::from_current_exe(cfg)?.run(3, 7).await?;
//!     assert_eq!(report.counter, 4);
//!     Ok(())
//! }
//! ```

pub mod channel;
mod config;
mod core;
mod error;
mod events;
mod journal;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use config::{COMPLETION_INCREMENT, COUNTED_WORKERS, Config, EXPECTED_TOTAL};
pub use core::{
    CompletionCounter, ControlRequest, Coordinator, ExitClass, ExitRecord, Launch,
    ProcessLauncher, Reap, Reaper, RunReport, SigTerm, Supervisor, SupervisorOutcome,
    Terminate, WaitAnyChild, WorkerTable,
    forward_child_exits, forward_control_signals,
};
pub use error::{ChannelError, RuntimeError, WorkerError};
pub use events::{Bus, Event, EventKind};
pub use journal::Journal;
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use workers::{Consumer, Producer, Role, Worker, WorkerHandle, run_role, run_worker};
