//! Workers: the two single-shot processes of the pipeline.
//!
//! - [`Producer`] reads `first` and `second` from channel A, writes `max` to channel B
//! - [`Consumer`] reads the result from channel B and reports it
//!
//! Each runs in its own process, launched by the coordinator re-executing the
//! current binary with a hidden `--worker <role>` flag. [`run_role`] is the
//! entry point of such a process.

mod consumer;
mod producer;
mod role;
mod worker;

pub use consumer::Consumer;
pub use producer::Producer;
pub use role::{Role, WorkerHandle};
pub use worker::{Worker, run_role, run_worker};
