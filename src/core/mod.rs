//! Runtime core: the coordinating process.
//!
//! The public entry point is [`Coordinator`], which drives one run end to end.
//!
//! Internal modules:
//! - [`coordinator`]: the run sequence, event listener and cleanup;
//! - [`reaper`]: collects terminated children and advances the counter;
//! - [`supervisor`]: timeout and liveness watchdog with operator requests;
//! - [`signals`]: forwards Unix signals into the async world;
//! - [`alive`]: table of launched workers and their liveness;
//! - [`counter`]: completion counter;
//! - [`exit`]: exit classification of a reaped child;
//! - [`process`]: launch, reap and terminate seams over the OS.

mod alive;
mod coordinator;
mod counter;
mod exit;
mod process;
mod reaper;
mod signals;
mod supervisor;

pub use alive::WorkerTable;
pub use coordinator::{Coordinator, RunReport};
pub use counter::CompletionCounter;
pub use exit::{ExitClass, ExitRecord};
pub use process::{Launch, ProcessLauncher, Reap, SigTerm, Terminate, WaitAnyChild};
pub use reaper::Reaper;
pub use signals::{ControlRequest, forward_child_exits, forward_control_signals};
pub use supervisor::{Supervisor, SupervisorOutcome};
